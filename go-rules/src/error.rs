use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoError {
    /// The target vertex already holds a stone.
    Overwrite,
    /// The placed chain would have no liberties and nothing was captured.
    Suicide,
    /// The move recreates the immediately preceding position.
    KoViolation,
    InvalidLayout(String),
    InvalidCoordinate(String),
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoError::Overwrite => write!(f, "overwrite"),
            GoError::Suicide => write!(f, "suicide"),
            GoError::KoViolation => write!(f, "ko violation"),
            GoError::InvalidLayout(msg) => write!(f, "invalid layout: {msg}"),
            GoError::InvalidCoordinate(coord) => write!(f, "invalid coordinate: {coord}"),
        }
    }
}

impl std::error::Error for GoError {}
