pub mod backend;
pub mod codegen;
pub mod compiler;
pub mod driver;
pub mod error;
pub mod input;
pub mod lexer;
pub mod logger;
pub mod options;
pub mod parser;
pub mod span;
pub mod table;
pub mod token;
