//! citeaudit Domain Layer
//!
//! Core data model shared by every stage of the citation-grounding pipeline.
//! Nothing in this crate performs I/O; it defines the records that flow between
//! stages and the trait boundaries to the collaborators that do.
//!
//! ## Key Concepts
//!
//! - **Claim**: a sentence-level assertion from a review, keyed by
//!   (review_id, section, claim_id) and immutable once parsed
//! - **Citation**: one author/year occurrence inside the claim's sentence
//! - **Source file**: a PDF in the source inventory, identified by surname and year
//! - **Section body**: a heading plus the text up to the next heading
//! - **Page offset**: logical minus physical page number for one source
//! - **Evidence chunk**: a scored text window proposed as support for a claim
//! - **Adjudication record**: the single ledger row kept per claim key
//!
//! ## Architecture
//!
//! Producers (parser, resolver, section assigner, retriever) hand these types to
//! each other by value. The ledger is the only long-lived mutable structure and
//! lives in `citeaudit-ledger`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod citation;
pub mod claim;
pub mod evidence;
pub mod ledger;
pub mod offset;
pub mod section;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use citation::{Citation, CitationKind, Span};
pub use claim::{ClaimFlags, ClaimKey, ClaimRecord, Priority};
pub use evidence::{EvidenceChunk, EvidenceItem, EvidenceQuery, EvidenceStrategy};
pub use ledger::{AdjudicationRecord, Decision, LedgerField, RewriteProposal, Verdict};
pub use offset::PageOffset;
pub use section::SectionBody;
pub use source::{PageMap, SourceFile};
pub use traits::{DecisionSource, PageTextProvider};
