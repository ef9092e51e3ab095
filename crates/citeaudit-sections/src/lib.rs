//! citeaudit Sections
//!
//! Assigns claims to the section of their review they most likely came from.
//!
//! # Overview
//!
//! Each review is split into headed sections. Section bodies are tokenized
//! and weighted with a tf-idf model fitted to that review alone. A claim is
//! scored against every candidate section by cosine similarity, scaled by a
//! penalty for summary headings and a boost for deeper headings. When no
//! body shares vocabulary with the claim, section titles are tried instead.
//!
//! # Architecture
//!
//! ```text
//! paragraphs / markdown → Outline → PreparedOutline (SectionModel)
//!                                 ↘ SectionCache [review_id]
//! claim text → SectionAssigner → SectionAssignment
//! ```
//!
//! # Example Usage
//!
//! ```
//! use citeaudit_sections::{Outline, SectionAssigner, SectionCache};
//!
//! let outline = Outline::from_markdown(
//!     "# Why are evaluations underused?\n\n## Methods\nWe screened abstracts.\n\n## Findings\nBudget cycles ignore evaluation results.\n",
//! );
//! let mut cache = SectionCache::new();
//! cache.insert("review-1", outline);
//!
//! let assigner = SectionAssigner::default();
//! let assignment = assigner
//!     .assign_in_cache(&cache, "review-1", "Evaluation results are ignored in budget cycles.")
//!     .unwrap();
//! assert_eq!(assignment.title, "Findings");
//! ```

#![warn(missing_docs)]

mod assigner;
mod config;
mod outline;
mod tfidf;
mod tokenize;

pub use assigner::{AssignmentMethod, PreparedOutline, SectionAssigner, SectionAssignment, SectionCache};
pub use config::{LevelBoosts, ScoringConfig};
pub use outline::{Outline, Paragraph, MAX_SECTION_LEVEL};
pub use tfidf::{cosine_similarity, term_frequencies, SectionModel, TermVector};
pub use tokenize::{is_stopword, tokenize};
