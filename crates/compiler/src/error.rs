//! Compilation error types

use dyescript_parser::ParseError;
use thiserror::Error;

/// Compilation result type
pub type DyeResult<T> = Result<T, DyeError>;

/// Errors raised while interpreting a statement or compiling a source
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DyeError {
    #[error("Invalid variable name '{name}'")]
    InvalidVariableName {
        name: String,
    },

    #[error("Missing value for '{name}' in {statement} statement")]
    MissingValue {
        statement: &'static str,
        name: String,
    },

    #[error("Missing operand for {statement} statement")]
    MissingOperand {
        statement: &'static str,
    },

    #[error("{feature} is not supported yet")]
    NotSupported {
        feature: &'static str,
    },

    #[error("Unresolved variable '&{name}'")]
    UnresolvedVariable {
        name: String,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl DyeError {
    pub fn missing_value(statement: &'static str, name: impl Into<String>) -> Self {
        Self::MissingValue { statement, name: name.into() }
    }

    pub fn not_supported(feature: &'static str) -> Self {
        Self::NotSupported { feature }
    }
}
