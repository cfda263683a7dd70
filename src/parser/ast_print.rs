use super::ast::*;
use std::fmt;
use std::fmt::Display;

// This module implements the Display trait for the AST
// Expressions are printed as fully parenthesized prefix forms to make the tree shape visible

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Expression::*;
        match self {
            Number(value) => write!(f, "{}", value),
            Variable(name) => write!(f, "{}", name),
            Assign(target, value) => write!(f, "(= {} {})", target, value),
            Unary(op, operand) => write!(f, "({} {})", op, operand),
            Binary(op, left, right) => write!(f, "({} {} {})", op, left, right),
            If {
                condition,
                then,
                otherwise,
            } => write!(f, "(if {} {} {})", condition, then, otherwise),
            For {
                variable,
                init,
                condition,
                step,
                body,
            } => {
                write!(f, "(for ({} {}) {}", variable, init, condition)?;
                if let Some(step) = step {
                    write!(f, " {}", step)?;
                }
                write!(f, " {})", body)
            }
            Var { bindings, body } => {
                write!(f, "(var (")?;
                for (i, (name, init)) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    match init {
                        Some(init) => write!(f, "({} {})", name, init)?,
                        None => write!(f, "({})", name)?,
                    }
                }
                write!(f, ") {})", body)
            }
            Call(callee, arguments) => {
                write!(f, "{}(", callee)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            PrototypeKind::Function => write!(f, "{}", self.name)?,
            PrototypeKind::Unary(op) => write!(f, "unary {}", op)?,
            PrototypeKind::Binary(op, precedence) => write!(f, "binary {} {}", op, precedence)?,
        }
        write!(f, "({})", self.parameters.join(" "))
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "def {} {}", self.prototype, self.body)
    }
}
