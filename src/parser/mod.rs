mod ast;
mod combinators;
mod error;
mod grammar;
mod locations;
mod tokenizer;

pub use ast::*;
pub use error::ParseError;
pub use grammar::parse;
pub use locations::{Location, Span};
pub use tokenizer::{check_input, tokenize_string, InputState, Token, TokenType, Tokenizer};
