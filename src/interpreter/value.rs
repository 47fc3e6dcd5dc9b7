use crate::parser::Operator;

use super::error::RuntimeError;

/// The result of evaluating a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    /// Produced by division, which never truncates.
    Real(f64),
    Boolean(bool),
    /// A finished `while` loop and the number of iterations it ran.
    Loop(usize),
    Unit,
}

impl Value {
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    pub(super) fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Boolean(_) => "boolean",
            Self::Loop(_) => "loop report",
            Self::Unit => "unit",
        }
    }

    pub(super) fn as_real(&self, operator: Operator) -> Result<f64, RuntimeError> {
        match self {
            Self::Integer(i) => Ok(*i as f64),
            Self::Real(r) => Ok(*r),
            other => Err(RuntimeError::TypeError {
                operator,
                found: other.type_name(),
            }),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            // Debug formatting keeps the trailing ".0" on whole numbers.
            Self::Real(r) => write!(f, "{r:?}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Loop(iterations) => write!(f, "Loop completed after {iterations} iterations."),
            Self::Unit => Ok(()),
        }
    }
}
