use super::ast::*;
use super::Parser;
use crate::error::{ParseError, ParseErrorKind};
use crate::expect;
use crate::table::OperatorTable;
use crate::token::TokenType;

impl<I: Iterator<Item = char>> Parser<I> {
    // <definition> ::= 'def' <prototype> <expression>
    pub fn parse_definition(&mut self, operators: &OperatorTable) -> Result<Function, ParseError> {
        self.next();
        let prototype = self.parse_prototype()?;
        let body = self.parse_expression(operators)?;
        log::debug!("Parsed definition of {}", prototype.name);
        Ok(Function { prototype, body })
    }

    // <external> ::= 'extern' <prototype>
    pub fn parse_extern(&mut self) -> Result<Prototype, ParseError> {
        self.next();
        let prototype = self.parse_prototype()?;
        log::debug!("Parsed extern {}", prototype.name);
        Ok(prototype)
    }

    // A bare expression is wrapped in an anonymous function without parameters
    // <top-level-expression> ::= <expression>
    pub fn parse_top_level_expression(
        &mut self,
        operators: &OperatorTable,
    ) -> Result<Function, ParseError> {
        let begin = self.peek_span();
        let body = self.parse_expression(operators)?;
        log::debug!("Parsed top-level expression {}", body);
        Ok(Function {
            prototype: Prototype::anonymous(self.span_from(begin)),
            body,
        })
    }

    // <prototype> ::= identifier '(' identifier* ')'
    //               | 'unary' character '(' identifier ')'
    //               | 'binary' character number? '(' identifier identifier ')'
    pub(super) fn parse_prototype(&mut self) -> Result<Prototype, ParseError> {
        let begin = self.peek_span();
        let (name, kind) = match *self.peek_type() {
            TokenType::Ident(_) => {
                let name = self.expect_identifier("function name in prototype")?;
                (name, PrototypeKind::Function)
            }
            TokenType::Unary => {
                self.next();
                let op = self.parse_operator_character("unary operator")?;
                (unary_function_name(op), PrototypeKind::Unary(op))
            }
            TokenType::Binary => {
                self.next();
                let op = self.parse_operator_character("binary operator")?;
                let precedence = self.parse_precedence()?;
                (binary_function_name(op), PrototypeKind::Binary(op, precedence))
            }
            _ => return Err(self.unexpected("function name in prototype")),
        };

        expect!(self, TokenType::Char('('), "'(' in prototype")?;
        let mut parameters = Vec::new();
        while let TokenType::Ident(parameter) = self.peek_type() {
            parameters.push(parameter.clone());
            self.next();
        }
        expect!(self, TokenType::Char(')'), "')' in prototype")?;

        let span = self.span_from(begin);
        let expected = match kind {
            PrototypeKind::Function => None,
            PrototypeKind::Unary(_) => Some(1),
            PrototypeKind::Binary(..) => Some(2),
        };
        if let Some(expected) = expected {
            if parameters.len() != expected {
                return Err(ParseError::new(
                    span,
                    ParseErrorKind::OperandCount(expected, parameters.len()),
                ));
            }
        }

        Ok(Prototype::new(span, name, parameters, kind))
    }

    fn parse_operator_character(&mut self, expected: &'static str) -> Result<char, ParseError> {
        match *self.peek_type() {
            TokenType::Char(op) if op.is_ascii() => {
                self.next();
                Ok(op)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    // The optional precedence of a binary operator, between 1 and 100
    fn parse_precedence(&mut self) -> Result<u32, ParseError> {
        match *self.peek_type() {
            TokenType::Number(value) => {
                if !(1.0..=100.0).contains(&value) {
                    return Err(ParseError::new(
                        self.peek_span(),
                        ParseErrorKind::InvalidPrecedence(value),
                    ));
                }
                self.next();
                Ok(value as u32)
            }
            _ => Ok(DEFAULT_BINARY_PRECEDENCE),
        }
    }
}
