// src/error.rs
use thiserror::Error;

/// The one error kind the engine ever raises, and only from `validate()`.
///
/// Runtime mismatches discovered while matching a document never raise:
/// they resolve to `false` for that clause (see `query::operators`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid query at {operator}: {message}")]
pub struct StructuralError {
    pub operator: String,
    pub message: String,
}

impl StructuralError {
    pub fn new(operator: impl Into<String>, message: impl Into<String>) -> Self {
        StructuralError {
            operator: operator.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StructuralError>;
