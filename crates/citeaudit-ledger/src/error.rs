//! Error types for the ledger

use thiserror::Error;

/// Errors that can occur while loading, merging or writing the ledger
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The authoritative claim set does not exist
    #[error("Scaffold input not found: {0}")]
    MissingScaffold(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// CSV read or write error
    #[error("CSV error: {0}")]
    Csv(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<std::io::Error> for LedgerError {
    fn from(e: std::io::Error) -> Self {
        LedgerError::Io(e.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(e: csv::Error) -> Self {
        LedgerError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Json(e.to_string())
    }
}
