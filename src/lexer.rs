use crate::span::Span;
use crate::token;
use crate::token::Token;
use crate::token::TokenType;

// Turns a character stream into tokens, one per call and without backtracking
// Tracks the location of every token for diagnostics
pub struct Lexer<I: Iterator<Item = char>> {
    input: I,
    line: u32,
    column: u32,
    offset: u32,
    last_char: Option<char>,
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn new(input: I) -> Lexer<I> {
        Lexer {
            input,
            line: 1,
            column: 1,
            offset: 0,
            last_char: None,
        }
    }
}

impl<I: Iterator<Item = char>> Lexer<I> {
    // Returns the current location of the lexer
    fn here(&self) -> Span {
        Span::new(self.line, self.column, self.offset, 1)
    }

    fn peek(&mut self) -> Option<char> {
        if self.last_char.is_none() {
            self.last_char = self.input.next();
        }
        self.last_char
    }

    fn next(&mut self) -> Option<char> {
        let result = self.peek();
        self.last_char = None;
        // Keeping track of current character location and offset
        if let Some(c) = result {
            self.offset += 1;
            self.column += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            }
        }
        result
    }

    // General lexing function
    // Identifiers and numbers are split out, comments are skipped entirely
    // Any character that does not start another token is returned as is
    pub fn next_token(&mut self) -> Token {
        loop {
            while let Some(c) = self.peek() {
                if !c.is_whitespace() {
                    break;
                }
                self.next();
            }

            let token = match self.peek() {
                None => Token::new(TokenType::Eof, self.here()),
                Some(c) if c.is_ascii_alphabetic() => self.lex_identifier(),
                Some(c) if c.is_ascii_digit() || c == '.' => self.lex_number(),
                Some('#') => {
                    self.skip_comment();
                    continue;
                }
                Some(c) => {
                    let span = self.here();
                    self.next();
                    Token::new(token::TokenType::from(c), span)
                }
            };
            log::trace!("{}: {}", token.span(), token);
            return token;
        }
    }

    // Lex an identifier or keyword
    // <identifier> ::= [A-Za-z][A-Za-z0-9]*
    fn lex_identifier(&mut self) -> Token {
        let start = self.here();
        let mut identifier = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphanumeric() {
                break;
            }
            self.next();
            identifier.push(c);
        }
        let span = Span::new(start.line(), start.column(), start.offset(), identifier.len() as u32);
        match token::keyword(&identifier) {
            Some(keyword) => Token::new(keyword, span),
            None => Token::new(TokenType::Ident(identifier), span),
        }
    }

    // Lex a number
    // Any run of digits and dots is accepted, see parse_number for malformed runs
    fn lex_number(&mut self) -> Token {
        let start = self.here();
        let mut number = String::new();
        while let Some(c) = self.peek() {
            if !(c.is_ascii_digit() || c == '.') {
                break;
            }
            self.next();
            number.push(c);
        }
        let span = Span::new(start.line(), start.column(), start.offset(), number.len() as u32);
        let value = parse_number(&number);
        if number.parse::<f64>().is_err() {
            let _ = crate::warning!(span, "malformed number '{}' is read as {}", number, value);
        }
        Token::new(TokenType::Number(value), span)
    }

    // Comments run from '#' until the end of the line
    fn skip_comment(&mut self) {
        while let Some(c) = self.next() {
            if c == '\n' || c == '\r' {
                break;
            }
        }
    }
}

/// Parses the text of a number token like strtod does:
/// the longest prefix that forms a valid number is used, or 0 if there is none.
pub fn parse_number(text: &str) -> f64 {
    if let Ok(value) = text.parse::<f64>() {
        return value;
    }
    (1..text.len())
        .rev()
        .find_map(|end| text[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}
