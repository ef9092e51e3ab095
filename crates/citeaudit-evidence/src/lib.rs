//! citeaudit Evidence
//!
//! Page offset calibration and evidence retrieval over page-marked source text.
//!
//! # Overview
//!
//! Source PDFs are converted elsewhere into plain text with a
//! `<<<PAGE=n>>>` line before each physical page. This crate:
//!
//! - splits and joins that format ([`split_pages`], [`join_pages`])
//! - learns how printed page numbers relate to physical pages from quotes
//!   that carry a stated page ([`PageOffsetCalibrator`])
//! - cuts pages into overlapping word windows ([`PageChunker`])
//! - ranks windows as evidence for each claim ([`EvidenceRetriever`])
//!
//! A source without an offset row is never page-shifted.
//!
//! # Architecture
//!
//! ```text
//! PageTextProvider → PageMap → PageChunker → windows
//!                                    ↓
//! ClaimRecord + PageOffset → EvidenceRetriever
//!     [exact quote → offset page → fuzzy] → EvidenceQuery
//! ```
//!
//! # Example Usage
//!
//! ```
//! use citeaudit_evidence::{split_pages, EvidenceRetriever, RetrievalConfig};
//!
//! let pages = split_pages("<<<PAGE=1>>>\nIntroduction\n<<<PAGE=2>>>\nBudget decisions ignore evaluation.");
//! let retriever = EvidenceRetriever::new(RetrievalConfig::default()).unwrap();
//! let source = retriever.prepare(pages);
//! assert_eq!(source.windows().len(), 2);
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod offset;
mod pages;
mod provider;
mod retriever;
mod similarity;

pub use chunking::{PageChunker, Window};
pub use config::RetrievalConfig;
pub use error::EvidenceError;
pub use offset::{integer_median, pages_with_quotes, stated_page_number, PageOffsetCalibrator};
pub use pages::{join_pages, page_marker, split_pages};
pub use provider::InMemoryPages;
pub use retriever::{EvidenceRetriever, SourceWindows, ANCHOR_SCORE};
pub use similarity::{ratio, token_set_ratio};
