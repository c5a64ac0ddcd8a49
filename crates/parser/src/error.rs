//! DyeScript lexing error types

use std::fmt;
use thiserror::Error;

/// Lexing result type
pub type ParseResult<T> = Result<T, ParseError>;

/// Source location in a DyeScript file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from start
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised while splitting source text into statements
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unterminated string at {location}")]
    UnterminatedString {
        location: SourceLocation,
    },

    #[error("Unterminated comment at {location}")]
    UnterminatedComment {
        location: SourceLocation,
    },

    #[error("Unbalanced '{character}' at {location}")]
    UnbalancedParen {
        character: char,
        location: SourceLocation,
    },
}

impl ParseError {
    /// Get the source location of this error
    pub fn location(&self) -> SourceLocation {
        match self {
            Self::UnterminatedString { location } => *location,
            Self::UnterminatedComment { location } => *location,
            Self::UnbalancedParen { location, .. } => *location,
        }
    }

    pub fn unbalanced(character: char, location: SourceLocation) -> Self {
        Self::UnbalancedParen { character, location }
    }
}
