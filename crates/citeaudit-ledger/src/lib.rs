//! citeaudit Ledger
//!
//! The per-claim adjudication ledger and the merge that fills it.
//!
//! # Overview
//!
//! The ledger holds exactly one [`AdjudicationRecord`](citeaudit_domain::AdjudicationRecord)
//! per claim key. A scaffold built from the authoritative claim set fixes
//! the key universe. External decision sources (adjudications and rewrite
//! proposals) are then merged in a fixed (priority, name) order, filling only
//! blank fields. Nothing is ever overwritten, so replaying inputs is
//! harmless and a new source only fills what is still blank.
//!
//! # Architecture
//!
//! ```text
//! ClaimRecord[] → Ledger::scaffold
//!                      ↓
//! MergeSource (JSONL) → LedgerMerger [priority order, fill blanks] → MergeReport
//!                      ↓
//!               ledger CSV → corrections, sampling plan
//! ```
//!
//! # Example Usage
//!
//! ```
//! use citeaudit_domain::{ClaimKey, LedgerField};
//! use citeaudit_ledger::{DecisionKind, DecisionRow, Ledger, LedgerMerger, MergeSource};
//! use citeaudit_domain::AdjudicationRecord;
//!
//! let mut ledger = Ledger::from_records(vec![AdjudicationRecord {
//!     review_id: "r".into(),
//!     section: "s".into(),
//!     claim_id: "c1".into(),
//!     ..Default::default()
//! }]);
//!
//! let row = DecisionRow {
//!     key: ClaimKey::new("r", "s", "c1"),
//!     values: vec![(LedgerField::Verdict, "SUPPORTED".to_string())],
//! };
//! let merger = LedgerMerger::new()
//!     .with_source(MergeSource::new("adjudication", 0, DecisionKind::Adjudication, vec![row]));
//!
//! let report = merger.merge(&mut ledger);
//! assert_eq!(report.fills(LedgerField::Verdict), 1);
//! assert_eq!(merger.merge(&mut ledger).total_fills(), 0);
//! ```

#![warn(missing_docs)]

mod corrections;
mod decision;
mod error;
mod io;
mod ledger;
mod merge;
mod sampling;

pub use corrections::{corrections, ActionType, CorrectionRow};
pub use decision::{json_text, DecisionKind, DecisionRow, KeyedDecision};
pub use error::LedgerError;
pub use io::{
    load_ledger, load_source, read_ledger, save_ledger, write_corrections, write_ledger, write_sampling_plan,
};
pub use ledger::Ledger;
pub use merge::{LedgerMerger, MergeReport, MergeSource, SourceReport};
pub use sampling::{correction_rate, sampling_plan, PlanRow, SamplingConfig};
