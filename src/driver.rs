use std::fs::read_to_string;

use crate::backend::{Backend, IRBackend};
use crate::compiler::Compiler;
use crate::error::{CompileError, DriverError, ParseError};
use crate::input::StdinChars;
use crate::lexer::Lexer;
use crate::options::Options;
use crate::parser::Parser;
use crate::span::Span;
use crate::token::TokenType;

/// What a single top-level construct amounted to
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Defined(String),
    Declared(String),
    Evaluated(f64),
    Failed(CompileError),
}

/// Reads top-level constructs from one input and hands them to the compiler
/// Yields one outcome per construct until the end of the input
/// Errors are reported and never end the session
pub struct Session<'a, I: Iterator<Item = char>, B: Backend> {
    parser: Parser<I>,
    compiler: &'a mut Compiler<B>,
}

impl<'a, I: Iterator<Item = char>, B: Backend> Session<'a, I, B> {
    pub fn new(input: I, compiler: &'a mut Compiler<B>) -> Session<'a, I, B> {
        Session {
            parser: Parser::new(Lexer::new(input)),
            compiler,
        }
    }

    /// Output written by executed code since the last call
    pub fn take_output(&mut self) -> String {
        self.compiler.take_output()
    }

    // <definition> ::= 'def' <prototype> <expression>
    fn definition(&mut self) -> Outcome {
        match self.parser.parse_definition(self.compiler.operators()) {
            Ok(function) => match self.compiler.handle_definition(&function) {
                Ok(()) => Outcome::Defined(function.prototype.name),
                Err(error) => failed(function.prototype.span, error),
            },
            Err(error) => self.parse_failed(error),
        }
    }

    // <external> ::= 'extern' <prototype>
    fn external(&mut self) -> Outcome {
        match self.parser.parse_extern() {
            Ok(prototype) => match self.compiler.handle_extern(&prototype) {
                Ok(()) => Outcome::Declared(prototype.name),
                Err(error) => failed(prototype.span, error),
            },
            Err(error) => self.parse_failed(error),
        }
    }

    fn top_level(&mut self) -> Outcome {
        match self
            .parser
            .parse_top_level_expression(self.compiler.operators())
        {
            Ok(function) => match self.compiler.handle_top_level(&function) {
                Ok(value) => Outcome::Evaluated(value),
                Err(error) => failed(function.prototype.span, error),
            },
            Err(error) => self.parse_failed(error),
        }
    }

    // Recovery skips the token the parser stopped at
    fn parse_failed(&mut self, error: ParseError) -> Outcome {
        let outcome = failed(error.span, error.into());
        self.parser.skip_token();
        outcome
    }
}

fn failed(span: Span, error: CompileError) -> Outcome {
    let _ = crate::error!(span, "{}", error);
    Outcome::Failed(error)
}

impl<'a, I: Iterator<Item = char>, B: Backend> Iterator for Session<'a, I, B> {
    type Item = Outcome;

    fn next(&mut self) -> Option<Outcome> {
        loop {
            let outcome = match *self.parser.peek_type() {
                TokenType::Eof => return None,
                TokenType::Char(';') => {
                    self.parser.next();
                    continue;
                }
                TokenType::Def => self.definition(),
                TokenType::Extern => self.external(),
                _ => self.top_level(),
            };
            log::trace!("Outcome {:?}", outcome);
            return Some(outcome);
        }
    }
}

// Runs every construct of one input, printing results and program output as they come
fn run<I: Iterator<Item = char>, B: Backend>(input: I, compiler: &mut Compiler<B>) {
    let mut session = Session::new(input, compiler);
    while let Some(outcome) = session.next() {
        eprint!("{}", session.take_output());
        if let Outcome::Evaluated(value) = outcome {
            println!("Evaluated to {:.6}", value);
        }
    }
}

/// Runs all input files in order in one session, or standard input when there are none
pub fn drive(options: Options) -> Result<(), DriverError> {
    log::info!("driver started");
    let sources = options
        .input
        .iter()
        .map(|path| {
            read_to_string(path).map_err(|source| DriverError::Io {
                path: path.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let backend = IRBackend::new(options.step_limit);
    let mut compiler = Compiler::new(backend).with_dump_ir(options.dump_ir);
    if sources.is_empty() {
        run(StdinChars::new(!options.quiet), &mut compiler);
    } else {
        for source in &sources {
            run(source.chars(), &mut compiler);
        }
    }
    log::info!("driver finished");
    Ok(())
}
