//! citeaudit Pipeline
//!
//! Runs the citation audit end to end over directories on disk.
//!
//! # Overview
//!
//! Stages run in order, each over the complete output of the previous one:
//!
//! 1. **extract_claims**: cited sentences from review documents
//! 2. **enrich**: section assignment and source-file resolution
//! 3. **calibrate_offsets**: printed-to-physical page offsets per source
//! 4. **retrieve_evidence**: ranked evidence windows per claim
//! 5. **build_ledger**: scaffold plus fill-blank merge of decision files
//!
//! `run_all` then derives the correction list and the human review sampling
//! plan from the merged ledger.
//!
//! Decisions themselves come from an external [`DecisionSource`](citeaudit_domain::DecisionSource);
//! [`collect_decisions`] runs one over the evidence queries and writes failures
//! as explicit sentinel verdicts.
//!
//! # Example Usage
//!
//! ```no_run
//! use citeaudit_pipeline::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::load("citeaudit.toml")?;
//! let summary = Pipeline::new(config)?.run_all()?;
//! println!("{} claims, {} resolved", summary.claims, summary.resolved);
//! # Ok::<(), anyhow::Error>(())
//! ```

#![warn(missing_docs)]

mod config;
mod decisions;
mod error;
pub mod io;
mod pipeline;
mod store;

pub use config::{DecisionSourceConfig, PathsConfig, PipelineConfig};
pub use decisions::collect_decisions;
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, Review, RunSummary, PREVIOUS_LEDGER_SOURCE};
pub use store::DirectoryTextStore;
