pub mod ast;
mod ast_print;
mod parse_expression;
mod parse_prototype;

pub use self::ast::*;

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenType};

// Consumes the current token if it matches the pattern
// Otherwise returns a ParseError describing what was expected
#[macro_export]
macro_rules! expect {
    ($parser:expr, $pattern:pat, $expected:expr) => {
        if matches!($parser.peek_type(), $pattern) {
            Ok($parser.next())
        } else {
            Err($parser.unexpected($expected))
        }
    };
}

// The parser always holds exactly one token of lookahead
// The operator table is passed in by the caller, since code generation changes it between parses
pub struct Parser<I: Iterator<Item = char>> {
    lexer: Lexer<I>,
    current: Token,
    previous_span: Span,
}

impl<I: Iterator<Item = char>> Parser<I> {
    pub fn new(mut lexer: Lexer<I>) -> Parser<I> {
        let current = lexer.next_token();
        let previous_span = current.span();
        Parser {
            lexer,
            current,
            previous_span,
        }
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    pub fn peek_type(&self) -> &TokenType {
        self.current.token()
    }

    pub fn peek_span(&self) -> Span {
        self.current.span()
    }

    pub fn at_end(&self) -> bool {
        *self.peek_type() == TokenType::Eof
    }

    // Consumes the current token and fetches the next one from the lexer
    pub fn next(&mut self) -> Token {
        let token = std::mem::replace(&mut self.current, self.lexer.next_token());
        self.previous_span = token.span();
        token
    }

    /// Error recovery: drops exactly one token
    pub fn skip_token(&mut self) {
        let token = self.next();
        log::debug!("Skipped {} for error recovery", token);
    }

    // The span from begin up to and including the last consumed token
    fn span_from(&self, begin: Span) -> Span {
        begin.to(&self.previous_span)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::new(
            self.peek_span(),
            ParseErrorKind::Expected(expected, self.current.to_string()),
        )
    }

    fn expect_identifier(&mut self, expected: &'static str) -> Result<String, ParseError> {
        match self.peek_type() {
            TokenType::Ident(name) => {
                let name = name.clone();
                self.next();
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }
}
