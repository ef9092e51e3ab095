//! citeaudit Resolver
//!
//! Maps citation authors and years to files in the source inventory.
//!
//! # Overview
//!
//! Source PDFs are named `<Surname>_<YYYY>[suffix].pdf`. Both file surnames
//! and citation authors go through the same [`normalize`] function, so
//! `World_Bank_2023.pdf` and "World Bank" meet at the key `world_bank`.
//! Lookup is exact on (key, year). When several files share a key the
//! choice is deterministic and the claim is flagged for review.
//!
//! # Architecture
//!
//! ```text
//! ClaimRecord → ResolutionTarget (author, inferred year)
//!             → AuthorYearResolver [exact key → text-fragment key]
//!             → Resolution { exact | ambiguous | no_match }
//! ```
//!
//! # Example Usage
//!
//! ```
//! use citeaudit_resolver::{AuthorYearResolver, ResolveStatus, SourceIndex};
//!
//! let index = SourceIndex::from_paths(["pdfs/Johnson_1998.pdf", "pdfs/Johnson_2009.pdf"]);
//! let resolver = AuthorYearResolver::new(index);
//!
//! let hit = resolver.resolve("Johnson et al.", "2009", None);
//! assert_eq!(hit.status, ResolveStatus::Exact);
//!
//! let miss = resolver.resolve("Johnson", "2010", None);
//! assert_eq!(miss.status, ResolveStatus::NoMatch);
//! ```

#![warn(missing_docs)]

mod error;
mod index;
mod metrics;
mod normalize;
mod resolver;
mod year;

pub use error::ResolverError;
pub use index::{parse_source_file, SourceIndex};
pub use metrics::ResolverMetrics;
pub use normalize::{normalize, PARTICLES};
pub use resolver::{
    tie_break, AuthorYearResolver, Resolution, ResolutionReport, ResolveStatus, ResolveStrategy,
    ResolveWarning,
};
pub use year::{citation_parts, first_year, infer_year_for_author, year_number, ResolutionTarget};
