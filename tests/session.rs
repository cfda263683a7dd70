use kaleido_lib as kaleido;

use kaleido::backend::{BackendError, IRBackend};
use kaleido::compiler::Compiler;
use kaleido::driver::{Outcome, Session};
use kaleido::error::{CodegenError, CompileError};

use Outcome::*;

fn run(source: &str) -> Vec<Outcome> {
    run_with(IRBackend::default(), source)
}

fn run_with(backend: IRBackend, source: &str) -> Vec<Outcome> {
    let mut compiler = Compiler::new(backend);
    Session::new(source.chars(), &mut compiler).collect()
}

fn codegen_failure(error: CodegenError) -> Outcome {
    Failed(CompileError::Codegen(error))
}

fn backend_failure(error: BackendError) -> Outcome {
    Failed(CompileError::Backend(error))
}

#[test]
fn empty_input() {
    assert_eq!(run(""), vec![]);
    assert_eq!(run(";;;"), vec![]);
    assert_eq!(run("# only a comment"), vec![]);
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(run("1+2*3;"), vec![Evaluated(7.0)]);
    assert_eq!(run("4-2-1;"), vec![Evaluated(1.0)]);
    assert_eq!(run("2*3-4*2;"), vec![Evaluated(-2.0)]);
    assert_eq!(run("(1+2)*3;"), vec![Evaluated(9.0)]);
    assert_eq!(run("# comment\n1;"), vec![Evaluated(1.0)]);
}

#[test]
fn comparison_and_if() {
    assert_eq!(run("1 < 2; 2 < 1;"), vec![Evaluated(1.0), Evaluated(0.0)]);
    assert_eq!(run("if 0 then 1 else 2;"), vec![Evaluated(2.0)]);
    assert_eq!(run("if 1 < 2 then 3 else 4;"), vec![Evaluated(3.0)]);
    assert_eq!(
        run("if 1 then if 0 then 1 else 2 else 3;"),
        vec![Evaluated(2.0)]
    );
}

#[test]
fn definitions_and_calls() {
    assert_eq!(
        run("def add(a b) a + b; add(1, 2);"),
        vec![Defined("add".to_string()), Evaluated(3.0)]
    );
    assert_eq!(
        run("def fib(x) if x < 3 then 1 else fib(x-1)+fib(x-2); fib(10);"),
        vec![Defined("fib".to_string()), Evaluated(55.0)]
    );
    assert_eq!(
        run("def f(x) x = x + 1; f(1);"),
        vec![Defined("f".to_string()), Evaluated(2.0)]
    );
}

#[test]
fn definitions_persist_across_units() {
    assert_eq!(
        run("def double(x) x * 2; double(2); double(double(3));"),
        vec![
            Defined("double".to_string()),
            Evaluated(4.0),
            Evaluated(12.0)
        ]
    );
}

#[test]
fn var_shadowing() {
    assert_eq!(run("var x = 1 in var x = x in x;"), vec![Evaluated(1.0)]);
    assert_eq!(run("var a = 1, b in a + b;"), vec![Evaluated(1.0)]);
    // An initializer sees earlier names of its group, but not its own
    assert_eq!(run("var a = 1, b = a + 1 in b;"), vec![Evaluated(2.0)]);
    assert_eq!(
        run("var a = a in a;"),
        vec![codegen_failure(CodegenError::UnknownVariable(
            "a".to_string()
        ))]
    );
}

#[test]
fn for_loop() {
    assert_eq!(run("for i = 1, i < 10 in i;"), vec![Evaluated(0.0)]);
    // The end condition is checked before the increment
    assert_eq!(
        run("var s = 0 in (for i = 0, i < 5 in s = s + i) + s;"),
        vec![Evaluated(15.0)]
    );
    assert_eq!(
        run("var s = 0 in (for i = 10, 0 < i, 0 - 2 in s = s + 1) + s;"),
        vec![Evaluated(6.0)]
    );
}

#[test]
fn scopes_are_restored() {
    assert_eq!(
        run("def f(x) (for x = 1, x < 3 in 0) + x; f(10);"),
        vec![Defined("f".to_string()), Evaluated(10.0)]
    );
    assert_eq!(
        run("def g(x) (var x = 5 in x) + x; g(1);"),
        vec![Defined("g".to_string()), Evaluated(6.0)]
    );
    assert_eq!(
        run("for i = 0, i < 1 in 0; i;"),
        vec![
            Evaluated(0.0),
            codegen_failure(CodegenError::UnknownVariable("i".to_string()))
        ]
    );
}

#[test]
fn redefinition() {
    assert_eq!(
        run("def f(x) x; def f(x) x + 1;"),
        vec![
            Defined("f".to_string()),
            codegen_failure(CodegenError::Redefinition("f".to_string()))
        ]
    );
    // Every top-level expression starts a new unit, a later definition replaces the earlier one
    assert_eq!(
        run("def f(x) x; f(1); def f(x) x + 1; f(1);"),
        vec![
            Defined("f".to_string()),
            Evaluated(1.0),
            Defined("f".to_string()),
            Evaluated(2.0)
        ]
    );
}

#[test]
fn extern_then_define() {
    assert_eq!(
        run("extern f(x); def f(x) x * 2; f(4);"),
        vec![
            Declared("f".to_string()),
            Defined("f".to_string()),
            Evaluated(8.0)
        ]
    );
    assert_eq!(
        run("extern g(a); def g(a b) a;"),
        vec![
            Declared("g".to_string()),
            codegen_failure(CodegenError::ConflictingDeclaration {
                name: "g".to_string(),
                expected: 1,
                found: 2
            })
        ]
    );
}

#[test]
fn forward_declaration() {
    let source = "
        extern odd(n);
        def even(n) if n < 1 then 1 else odd(n - 1);
        def odd(n) if n < 1 then 0 else even(n - 1);
        even(10);
        even(7);
    ";
    assert_eq!(
        run(source),
        vec![
            Declared("odd".to_string()),
            Defined("even".to_string()),
            Defined("odd".to_string()),
            Evaluated(1.0),
            Evaluated(0.0)
        ]
    );
}

#[test]
fn user_binary_operator_precedence() {
    let outcomes = run("
        def binary % 50 (a b) a - b;
        10 - 4 % 2;
        def binary @ 5 (a b) a - b;
        10 - 4 @ 2;
    ");
    assert_eq!(
        outcomes,
        vec![
            Defined("binary%".to_string()),
            Evaluated(8.0),
            Defined("binary@".to_string()),
            Evaluated(4.0)
        ]
    );
}

#[test]
fn default_binary_precedence() {
    // 30 binds tighter than '+' and looser than '*'
    let outcomes = run("def binary | (a b) a - b; 1 + 5 | 2 * 2;");
    assert_eq!(outcomes[1], Evaluated(2.0));
}

#[test]
fn user_unary_operator() {
    assert_eq!(
        run("def unary - (v) 0 - v; -3 + 5; --2;"),
        vec![
            Defined("unary-".to_string()),
            Evaluated(2.0),
            Evaluated(2.0)
        ]
    );
    assert_eq!(
        run("!1; 2;"),
        vec![
            codegen_failure(CodegenError::UnknownUnaryOperator('!')),
            Evaluated(2.0)
        ]
    );
}

#[test]
fn failed_operator_keeps_precedence() {
    // The body fails but the operator still parses afterwards
    let outcomes = run("def binary ~ 15 (a b) c; 1 ~ 2;");
    assert_eq!(
        outcomes,
        vec![
            codegen_failure(CodegenError::UnknownVariable("c".to_string())),
            backend_failure(BackendError::UnresolvedSymbol("binary~".to_string()))
        ]
    );
}

#[test]
fn parse_error_recovery() {
    let outcomes = run("def foo( 7 8;");
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0], Failed(CompileError::Parse(_))));
    assert_eq!(outcomes[1], Evaluated(8.0));

    let outcomes = run("def binary $ 200 (a b) a; 1;");
    assert!(matches!(outcomes[0], Failed(CompileError::Parse(_))));
    assert_eq!(outcomes.last(), Some(&Evaluated(1.0)));
}

#[test]
fn codegen_errors_do_not_end_the_session() {
    assert_eq!(
        run("def f(x) x; g(1); f(5);"),
        vec![
            Defined("f".to_string()),
            codegen_failure(CodegenError::UnknownFunction("g".to_string())),
            Evaluated(5.0)
        ]
    );
    assert_eq!(
        run("def f(a) a; f(1, 2);"),
        vec![
            Defined("f".to_string()),
            codegen_failure(CodegenError::ArgumentCount {
                callee: "f".to_string(),
                expected: 1,
                found: 2
            })
        ]
    );
    assert_eq!(
        run("def f(a) 1 = a;"),
        vec![codegen_failure(CodegenError::InvalidAssignment)]
    );
}

#[test]
fn runtime_library() {
    let mut compiler = Compiler::new(IRBackend::default());
    let mut session = Session::new(
        "extern putchard(c); extern printd(x); putchard(72) + putchard(105); printd(2.5);"
            .chars(),
        &mut compiler,
    );
    let outcomes: Vec<_> = session.by_ref().collect();
    assert_eq!(
        outcomes,
        vec![
            Declared("putchard".to_string()),
            Declared("printd".to_string()),
            Evaluated(0.0),
            Evaluated(0.0)
        ]
    );
    assert_eq!(session.take_output(), "Hi2.500000\n");

    assert_eq!(
        run("extern sqrt(x); extern pow(x y); sqrt(pow(3, 2) + 16);")[2],
        Evaluated(5.0)
    );
}

#[test]
fn execution_limits() {
    assert_eq!(
        run_with(IRBackend::new(1_000), "for i = 0, 1 in 0; 1;"),
        vec![
            backend_failure(BackendError::StepLimit(1_000)),
            Evaluated(1.0)
        ]
    );

    // Deep interpreter recursion needs more than the default test thread stack
    let outcomes = std::thread::Builder::new()
        .stack_size(64 << 20)
        .spawn(|| run("def down(x) down(x + 1); down(0);"))
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(outcomes[1], backend_failure(BackendError::CallDepth(512)));
}
