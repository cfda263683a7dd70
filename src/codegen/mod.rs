use crate::backend::Backend;
use crate::error::CodegenError;
use crate::table::{OperatorTable, PrototypeTable, ScopeTable};

mod expression_codegen;
mod function_codegen;

// This module is used to generate code for the AST through a backend

// The trait Codegen is used by expressions
// The function returns the backend value representing its result
// A failure abandons the whole top-level construct, the scopes are unwound on the way out
trait Codegen {
    fn codegen<B: Backend>(&self, context: &mut CodegenContext<B>)
        -> Result<B::Value, CodegenError>;
}

/// The session state code generation reads and changes
pub struct CodegenContext<'a, B: Backend> {
    pub operators: &'a mut OperatorTable,
    pub prototypes: &'a mut PrototypeTable,
    pub scopes: &'a mut ScopeTable<B::Storage>,
    pub backend: &'a mut B,
}

impl<'a, B: Backend> CodegenContext<'a, B> {
    pub fn new(
        operators: &'a mut OperatorTable,
        prototypes: &'a mut PrototypeTable,
        scopes: &'a mut ScopeTable<B::Storage>,
        backend: &'a mut B,
    ) -> CodegenContext<'a, B> {
        CodegenContext {
            operators,
            prototypes,
            scopes,
            backend,
        }
    }

    /// Finds a function in the open unit, or declares it there from its registered prototype
    pub fn get_function(&mut self, name: &str) -> Option<B::Function> {
        if let Some(function) = self.backend.lookup_function(name) {
            return Some(function);
        }
        let prototype = self.prototypes.get(name)?;
        log::trace!("Declaring {} from its prototype", name);
        Some(
            self.backend
                .declare_function(&prototype.name, &prototype.parameters),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::IRBackend;
    use crate::parser::ast::*;
    use crate::span::Span;

    struct Session {
        operators: OperatorTable,
        prototypes: PrototypeTable,
        scopes: ScopeTable<u32>,
        backend: IRBackend,
    }

    impl Session {
        fn new() -> Session {
            let mut backend = IRBackend::default();
            backend.open_unit();
            Session {
                operators: OperatorTable::default(),
                prototypes: PrototypeTable::new(),
                scopes: ScopeTable::new(),
                backend,
            }
        }

        fn generate(&mut self, body: Expression) -> Result<(), CodegenError> {
            let function = Function {
                prototype: Prototype::anonymous(Span::default()),
                body,
            };
            let mut context = CodegenContext::new(
                &mut self.operators,
                &mut self.prototypes,
                &mut self.scopes,
                &mut self.backend,
            );
            function.codegen(&mut context).map(|_| ())
        }
    }

    fn number(value: f64) -> Box<Expression> {
        Box::new(Expression::Number(value))
    }

    #[test]
    fn unknown_binary_operator() {
        let mut session = Session::new();
        let body = Expression::Binary('%', number(1.0), number(2.0));
        assert_eq!(
            session.generate(body),
            Err(CodegenError::UnknownBinaryOperator('%'))
        );
        assert!(session.backend.lookup_function(ANONYMOUS_FUNCTION).is_none());
    }

    #[test]
    fn failure_unwinds_scopes() {
        let mut session = Session::new();
        let body = Expression::Var {
            bindings: vec![("a".to_string(), None)],
            body: Box::new(Expression::For {
                variable: "i".to_string(),
                init: number(0.0),
                condition: number(0.0),
                step: None,
                body: Box::new(Expression::Variable("missing".to_string())),
            }),
        };
        assert_eq!(
            session.generate(body),
            Err(CodegenError::UnknownVariable("missing".to_string()))
        );
        assert!(session.scopes.is_empty());
    }

    #[test]
    fn get_function_declares_from_prototype() {
        let mut session = Session::new();
        session.prototypes.insert(Prototype::new(
            Span::default(),
            "sin".to_string(),
            vec!["x".to_string()],
            PrototypeKind::Function,
        ));
        let mut context = CodegenContext::new(
            &mut session.operators,
            &mut session.prototypes,
            &mut session.scopes,
            &mut session.backend,
        );
        let function = context.get_function("sin").unwrap();
        assert_eq!(context.backend.parameter_count(function), 1);
        assert!(!context.backend.has_body(function));
        assert!(context.get_function("cos").is_none());
    }
}
