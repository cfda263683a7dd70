use std::fmt::Display;

use crate::backend::BackendError;
use crate::span::Span;

// Reports a diagnostic for a source location on stderr and returns it as a string
#[macro_export]
macro_rules! error {
    ($span:expr,$( $exp:expr ),*) => {
        {
            use colored::Colorize;
            let string= format!("{}: error: {}",$span,format!($($exp,)*).red());
            eprintln!("{}",string);
            string
        }
    };
}

#[macro_export]
macro_rules! warning {
    ($span:expr,$( $exp:expr ),*) => {
        {
            use colored::Colorize;
            let string = format!("{}: warning: {}",$span,format!($($exp,)*).purple());
            eprintln!("{}",string);
            string
        }
    };
}

/// A grammar violation found by the parser
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParseError {
    pub span: Span,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(span: Span, kind: ParseErrorKind) -> Self {
        Self { span, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    ExpectedExpression(String),
    Expected(&'static str, String),
    InvalidPrecedence(f64),
    OperandCount(usize, usize),
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ParseErrorKind::*;
        match self {
            ExpectedExpression(found) => {
                write!(f, "unknown token {} when expecting an expression", found)
            }
            Expected(expected, found) => write!(f, "expected {}, found {}", expected, found),
            InvalidPrecedence(value) => {
                write!(f, "invalid precedence {}: must be 1..100", value)
            }
            OperandCount(expected, found) => write!(
                f,
                "invalid number of operands for operator: expected {}, found {}",
                expected, found
            ),
        }
    }
}

/// Failures while generating code for a single top-level construct
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CodegenError {
    #[error("unknown variable name '{0}'")]
    UnknownVariable(String),
    #[error("destination of '=' must be a variable")]
    InvalidAssignment,
    #[error("unknown function referenced: '{0}'")]
    UnknownFunction(String),
    #[error("unknown unary operator '{0}'")]
    UnknownUnaryOperator(char),
    #[error("unknown binary operator '{0}'")]
    UnknownBinaryOperator(char),
    #[error("incorrect number of arguments passed to '{callee}': expected {expected}, found {found}")]
    ArgumentCount {
        callee: String,
        expected: usize,
        found: usize,
    },
    #[error("function '{0}' cannot be redefined")]
    Redefinition(String),
    #[error("conflicting declaration of '{name}': previously declared with {expected} parameters, now {found}")]
    ConflictingDeclaration {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Every failure a single driver step can report
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Fatal failures of the driver outside of a session
#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("failed to open file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
