use std::fmt;
use std::io;

/// Line and column of a character in the source text. Lines count from 1,
/// columns from 0 and reset after every newline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Position {
        Position { line: 1, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// Raised by the lexer or the parser; always carries a position.
    #[error("{message} ({position})")]
    Syntax {
        message: String,
        position: Position,
    },
    #[error("Undefined variable {0}")]
    UndefinedVariable(String),
    #[error("Expected {expected} operand for `{operator}` but got {value}")]
    TypeError {
        operator: String,
        expected: &'static str,
        value: String,
    },
    #[error("Div by zero")]
    DivisionByZero,
    #[error("Cannot assign to {0}")]
    InvalidAssignmentTarget(String),
    #[error("Trying to call non function expression: {0}")]
    NotCallable(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err.to_string())
    }
}
