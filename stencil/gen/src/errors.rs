//! Error types for the stencil generator.
//!
//! Every variant is fatal: a generation run stops at the first error and
//! leaves the artifacts it already committed in place.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// An output root or package directory is unusable, or an input file
    /// could not be loaded.
    #[error("{label} {reason}")]
    Configuration {
        /// What the offending setting is (e.g., "Sources output").
        label: String,
        /// Why it cannot be used.
        reason: String,
    },

    /// A service cannot be generated as described.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Failed to open, write, close, rename or remove an artifact file
    #[error("I/O failure on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A content strategy failed, or the assembled artifact is not valid code.
    #[error("Content generation failed: {0}")]
    Content(String),
}

impl GeneratorError {
    pub(crate) fn configuration(label: impl Into<String>, reason: impl Into<String>) -> Self {
        GeneratorError::Configuration {
            label: label.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
