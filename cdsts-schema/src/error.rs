//! Error types for schema parsing and lookup.

use thiserror::Error;

/// Error type for CSN parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON decoding error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid schema structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for schema lookups.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Definition not found.
    #[error("definition '{name}' not found")]
    DefinitionNotFound {
        /// Fully-qualified name.
        name: String,
    },
}

impl ParseError {
    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}

impl SchemaError {
    /// Creates a definition-not-found error.
    pub fn definition_not_found(name: impl Into<String>) -> Self {
        Self::DefinitionNotFound { name: name.into() }
    }
}
