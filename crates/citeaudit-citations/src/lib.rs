//! citeaudit Citations
//!
//! Finds author/year citations in review sentences and turns cited sentences
//! into claim registry rows.
//!
//! # Overview
//!
//! Parsing is an explicit grammar over four kinds of lexeme: author lists,
//! years, page locators (`p. 12`, `pp. 3-5`) and the secondary marker
//! (`as cited in`). Parenthetical blocks are read first, then narrative
//! `Name (YEAR)` forms. Nothing here fails: malformed input yields no
//! citations.
//!
//! # Architecture
//!
//! ```text
//! review text → sentences → CitationParser → Citation → ClaimExtractor → ClaimRecord
//!                                                            ↑
//!                                                     ReferenceIndex
//! ```
//!
//! # Example Usage
//!
//! ```
//! use citeaudit_citations::CitationParser;
//! use citeaudit_domain::CitationKind;
//!
//! let parser = CitationParser::new();
//! let found = parser.parse("Uptake doubled (Smith & Jones, 2010, p. 4).");
//!
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].kind, CitationKind::Parenthetical);
//! assert_eq!(found[0].author, "Smith & Jones");
//! assert_eq!(found[0].stated_page.as_deref(), Some("4"));
//! ```

#![warn(missing_docs)]

mod extractor;
mod lexeme;
mod parser;
mod references;
mod text;

pub use extractor::{ClaimExtractor, SectionTracker};
pub use parser::{parse_citations, CitationParser};
pub use references::ReferenceIndex;
pub use text::{
    classify, contains_quotation, has_numbers, is_causal_or_normative, normalize_quotes,
    quoted_spans, split_sentences,
};
