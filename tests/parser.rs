use expect_test::{expect, Expect};
use kaleido_lib as kaleido;

use kaleido::error::{ParseError, ParseErrorKind};
use kaleido::lexer::Lexer;
use kaleido::parser::Parser;
use kaleido::table::OperatorTable;
use kaleido::token::TokenType;

fn parse_with(operators: &OperatorTable, source: &str) -> Result<String, ParseError> {
    let mut parser = Parser::new(Lexer::new(source.chars()));
    let result = match parser.peek_type() {
        TokenType::Def => parser.parse_definition(operators)?.to_string(),
        TokenType::Extern => parser.parse_extern()?.to_string(),
        _ => parser.parse_top_level_expression(operators)?.body.to_string(),
    };
    Ok(result)
}

fn check(source: &str, expect: Expect) {
    let actual = match parse_with(&OperatorTable::default(), source) {
        Ok(tree) => tree,
        Err(error) => format!("error at {}: {}", error.span, error),
    };
    expect.assert_eq(&actual);
}

#[test]
fn builtin_precedence() {
    check("1 + 2 * 3", expect![["(+ 1 (* 2 3))"]]);
    check("1 * 2 + 3", expect![["(+ (* 1 2) 3)"]]);
    check("a - b - c", expect![["(- (- a b) c)"]]);
    check("a < b + 1", expect![["(< a (+ b 1))"]]);
    check("x = y + 1 < 2", expect![["(= x (< (+ y 1) 2))"]]);
    check("(a + b) * c", expect![["(* (+ a b) c)"]]);
}

#[test]
fn unary_operators() {
    check("!x + 1", expect![["(+ (! x) 1)"]]);
    check("-!x", expect![["(- (! x))"]]);
    check("a * -b", expect![["(* a (- b))"]]);
}

#[test]
fn calls() {
    check("f()", expect![["f()"]]);
    check("f(1, g(x) + 2, y)", expect![["f(1, (+ g(x) 2), y)"]]);
}

#[test]
fn control_flow() {
    check("if a < b then a else b", expect![["(if (< a b) a b)"]]);
    check(
        "for i = 1, i < n in f(i)",
        expect![["(for (i 1) (< i n) f(i))"]],
    );
    check(
        "for i = 1, i < n, 2 in f(i)",
        expect![["(for (i 1) (< i n) 2 f(i))"]],
    );
    check(
        "var a = 1, b, c = a in a + b",
        expect![["(var ((a 1) (b) (c a)) (+ a b))"]],
    );
}

#[test]
fn prototypes() {
    check("def f(a b) a", expect![["def f(a b) a"]]);
    check("extern sin(x)", expect![["sin(x)"]]);
    check("def unary ! (v) 0 - v", expect![["def unary !(v) (- 0 v)"]]);
    check("def binary | 5 (a b) a", expect![["def binary | 5(a b) a"]]);
    check("def binary & (a b) a", expect![["def binary & 30(a b) a"]]);
}

#[test]
fn errors() {
    check(
        "def f(a, b) a",
        expect![["error at 1:8: expected ')' in prototype, found ','"]],
    );
    check(
        "def binary | 0 (a b) a",
        expect![["error at 1:14: invalid precedence 0: must be 1..100"]],
    );
    check(
        "def unary ! (a b) a",
        expect![["error at 1:5: invalid number of operands for operator: expected 1, found 2"]],
    );
    check(
        "if a then b",
        expect![["error at 1:12: expected 'else', found end of input"]],
    );
    check("then", expect![["error at 1:1: unknown token 'then' when expecting an expression"]]);
    check("f(a b)", expect![["error at 1:5: expected ')' or ',' in argument list, found 'b'"]]);
}

#[test]
fn user_operator_precedence() {
    let mut operators = OperatorTable::default();
    operators.install('|', 5);
    operators.install('&', 60);
    let tree = parse_with(&operators, "a | b + c & d").unwrap();
    expect![["(| a (+ b (& c d)))"]].assert_eq(&tree);

    // Without a precedence the character ends the expression
    let tree = parse_with(&OperatorTable::default(), "a | b").unwrap();
    expect![["a"]].assert_eq(&tree);
}

#[test]
fn error_kind() {
    let error = parse_with(&OperatorTable::default(), "def binary | 101 (a b) a").unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::InvalidPrecedence(101.0));
}
