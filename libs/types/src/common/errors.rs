//! Error types for identifier validation

use thiserror::Error;

/// Errors that can occur during typed name validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Name is empty
    #[error("identifier cannot be empty")]
    EmptyName,

    /// Name contains whitespace or control characters
    #[error("identifier '{name}' contains whitespace")]
    InvalidCharacter { name: String },
}
