use thiserror::Error;

use crate::parser::Operator;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("undefined function: {0}")]
    UndefinedFunction(String),
    #[error("{0} is not a function")]
    NotAFunction(String),
    #[error("{0} is a function and cannot be used as a value")]
    FunctionAsValue(String),
    #[error("{name} takes {expected} argument(s) but {found} were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("unsupported {found} operand for '{operator}'")]
    TypeError {
        operator: Operator,
        found: &'static str,
    },
    #[error("unknown operator: {0}")]
    UnknownOperator(Operator),
    #[error("infinite loop detected in 'while' after {0} iterations")]
    InfiniteLoop(usize),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in '{0}'")]
    ArithmeticOverflow(Operator),
    #[error("maximum call depth of {0} exceeded")]
    RecursionLimit(usize),
}
