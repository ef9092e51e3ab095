//! Error types for evidence retrieval

use thiserror::Error;

/// Errors that can occur during calibration or retrieval
#[derive(Error, Debug)]
pub enum EvidenceError {
    /// Invalid retrieval configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Page text provider failed
    #[error("Page text provider error for {source_path}: {message}")]
    Provider {
        /// Source the text was requested for
        source_path: String,
        /// Provider error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for EvidenceError {
    fn from(e: std::io::Error) -> Self {
        EvidenceError::Io(e.to_string())
    }
}
