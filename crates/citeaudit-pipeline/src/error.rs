//! Error types for the pipeline

use citeaudit_evidence::EvidenceError;
use citeaudit_ledger::LedgerError;
use citeaudit_resolver::ResolverError;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running pipeline stages
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required input file or directory does not exist
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Source resolution error
    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),

    /// Evidence retrieval error
    #[error("Evidence error: {0}")]
    Evidence(#[from] EvidenceError),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
