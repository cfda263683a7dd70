use std::collections::HashMap;
use std::fmt::Display;

use lazy_static::lazy_static;

use crate::span::Span;

#[derive(PartialEq, Clone, Debug)]
pub enum TokenType {
    Eof,

    //Command keywords
    Def,
    Extern,

    //Control flow keywords
    If,
    Then,
    Else,
    For,
    In,

    //Operator definition keywords
    Binary,
    Unary,

    //Binding keyword
    Var,

    //Types with a value
    Ident(String),
    Number(f64),

    // Any other character, used for punctuation and operators
    Char(char),
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = {
        use TokenType::*;
        let mut keywords = HashMap::new();
        keywords.insert("def", Def);
        keywords.insert("extern", Extern);
        keywords.insert("if", If);
        keywords.insert("then", Then);
        keywords.insert("else", Else);
        keywords.insert("for", For);
        keywords.insert("in", In);
        keywords.insert("binary", Binary);
        keywords.insert("unary", Unary);
        keywords.insert("var", Var);
        keywords
    };
}

/// Returns the keyword token for `identifier`, if it is reserved
pub fn keyword(identifier: &str) -> Option<TokenType> {
    KEYWORDS.get(identifier).cloned()
}

#[derive(PartialEq, Clone, Debug)]
pub struct Token {
    span: Span,
    token: TokenType,
}

impl Token {
    pub fn new(token: TokenType, span: Span) -> Token {
        Token { span, token }
    }
    pub fn span(&self) -> Span {
        self.span
    }
    pub fn token(&self) -> &TokenType {
        &self.token
    }
}

impl From<char> for TokenType {
    fn from(c: char) -> TokenType {
        TokenType::Char(c)
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TokenType::*;
        match self {
            Eof => write!(f, "end of input"),

            Def => write!(f, "'def'"),
            Extern => write!(f, "'extern'"),
            If => write!(f, "'if'"),
            Then => write!(f, "'then'"),
            Else => write!(f, "'else'"),
            For => write!(f, "'for'"),
            In => write!(f, "'in'"),
            Binary => write!(f, "'binary'"),
            Unary => write!(f, "'unary'"),
            Var => write!(f, "'var'"),

            Ident(val) => write!(f, "'{}'", val),
            Number(val) => write!(f, "'{}'", val),
            Char(c) => write!(f, "'{}'", c),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token)
    }
}
