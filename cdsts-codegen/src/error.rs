//! Error types for code generation.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parse error.
    #[error("schema parse error: {0}")]
    Parse(#[from] cdsts_schema::ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output location could not be created or written.
    #[error("cannot write output '{}': {source}", path.display())]
    OutputPath {
        /// Offending path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// External schema compiler failed.
    #[error("schema compiler '{command}' failed: {message}")]
    Compiler {
        /// Command that was run.
        command: String,
        /// Failure detail.
        message: String,
    },
}

impl CodegenError {
    /// Creates an output path error for the given path.
    pub fn output_path(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::OutputPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a compiler error.
    pub fn compiler(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compiler {
            command: command.into(),
            message: message.into(),
        }
    }
}
