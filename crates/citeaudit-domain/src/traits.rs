//! Trait definitions for external collaborators
//!
//! Text extraction and decision making happen outside the pipeline. These
//! traits define the shapes those collaborators must supply.

use crate::evidence::EvidenceQuery;
use crate::ledger::Decision;
use crate::source::PageMap;

/// Supplies page-marked text for a resolved source
///
/// Implemented by the pipeline (text directory) and by tests (in memory)
pub trait PageTextProvider {
    /// Error type for provider operations
    type Error;

    /// Page text for a source path, or `None` when no text has been extracted
    fn pages(&self, source_pdf_path: &str) -> Result<Option<PageMap>, Self::Error>;
}

/// Produces an adjudication decision for a claim and its evidence
///
/// Typically backed by an LLM. Retry and timeout policy belong to the
/// implementation; a returned error becomes the failure sentinel.
pub trait DecisionSource {
    /// Error type for decision operations
    type Error: std::fmt::Display;

    /// Decide one claim
    fn decide(&self, query: &EvidenceQuery) -> Result<Decision, Self::Error>;
}
