//! Error types for the resolver

use thiserror::Error;

/// Errors that can occur while indexing the source inventory
///
/// Resolution itself never fails; `no_match` and `ambiguous` are outcomes.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// The inventory path is missing or not a directory
    #[error("Source directory not found: {0}")]
    DirectoryNotFound(String),

    /// Filesystem error while scanning the inventory
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResolverError {
    fn from(e: std::io::Error) -> Self {
        ResolverError::Io(e.to_string())
    }
}
