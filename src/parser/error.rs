use thiserror::Error;

use super::locations::Location;

/// Everything that can go wrong before evaluation starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("lexical error: unrecognized character '{character}' at {location}")]
    Lex { character: char, location: Location },
    #[error("syntax error: unexpected {found} at {location}, expected {}", .expected.join(" or "))]
    Syntax {
        found: String,
        expected: Vec<String>,
        location: Location,
    },
    #[error("syntax error: integer literal '{literal}' at {location} is out of range")]
    InvalidInteger { literal: String, location: Location },
    #[error("syntax error: more than {limit} nested levels at {location}")]
    TooDeep { limit: usize, location: Location },
}
