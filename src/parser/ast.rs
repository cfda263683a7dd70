use crate::span::Span;

/// Name of the synthetic function wrapping a bare top-level expression
pub const ANONYMOUS_FUNCTION: &str = "__anon_expr";

/// Default precedence of a binary operator declared without one
pub const DEFAULT_BINARY_PRECEDENCE: u32 = 30;

// Every node is exclusively owned by its parent
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Variable(String),
    // The target is only checked to be a variable during code generation
    Assign(Box<Expression>, Box<Expression>),
    Unary(char, Box<Expression>),
    Binary(char, Box<Expression>, Box<Expression>),
    If {
        condition: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },
    For {
        variable: String,
        init: Box<Expression>,
        condition: Box<Expression>,
        step: Option<Box<Expression>>,
        body: Box<Expression>,
    },
    Var {
        bindings: Vec<(String, Option<Expression>)>,
        body: Box<Expression>,
    },
    Call(String, Vec<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrototypeKind {
    Function,
    Unary(char),
    Binary(char, u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub span: Span,
    pub name: String,
    pub parameters: Vec<String>,
    pub kind: PrototypeKind,
}

impl Prototype {
    pub fn new(span: Span, name: String, parameters: Vec<String>, kind: PrototypeKind) -> Self {
        Prototype {
            span,
            name,
            parameters,
            kind,
        }
    }

    pub fn anonymous(span: Span) -> Self {
        Prototype::new(
            span,
            ANONYMOUS_FUNCTION.to_string(),
            Vec::new(),
            PrototypeKind::Function,
        )
    }

    /// The operator character and precedence, if this declares a binary operator
    pub fn binary_operator(&self) -> Option<(char, u32)> {
        match self.kind {
            PrototypeKind::Binary(op, precedence) => Some((op, precedence)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub prototype: Prototype,
    pub body: Expression,
}

/// Function name of a user defined unary operator
pub fn unary_function_name(op: char) -> String {
    format!("unary{}", op)
}

/// Function name of a user defined binary operator
pub fn binary_function_name(op: char) -> String {
    format!("binary{}", op)
}
