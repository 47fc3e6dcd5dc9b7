use thiserror::Error;

use crate::interpreter::RuntimeError;
use crate::parser::ParseError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}
