//! Claim extraction from review text

use citeaudit_domain::{ClaimKey, ClaimRecord};
use tracing::debug;

use crate::parser::CitationParser;
use crate::references::{is_reference_heading, ReferenceIndex};
use crate::text::{classify, split_sentences};

/// Section label used before the first recognised heading
pub const UNKNOWN_SECTION: &str = "unknown";

/// Tracks the current section while walking review lines
///
/// A heading is a markdown `#` line, an all-caps line of at most eight words,
/// or a line of at most eight words ending in `:`. Labels are lowercased.
#[derive(Debug, Clone)]
pub struct SectionTracker {
    current: String,
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self {
            current: UNKNOWN_SECTION.to_string(),
        }
    }
}

impl SectionTracker {
    /// Start in the unknown section
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one trimmed line; returns true if it was a heading
    pub fn observe(&mut self, line: &str) -> bool {
        let short = line.split_whitespace().count() <= 8;
        let label = if line.starts_with('#') {
            Some(line.trim_start_matches('#').trim())
        } else if short && is_all_caps(line) {
            Some(line)
        } else if short && line.ends_with(':') {
            Some(line[..line.len() - 1].trim())
        } else {
            None
        };

        match label {
            Some(label) => {
                self.current = label.to_lowercase();
                true
            }
            None => false,
        }
    }

    /// Current section label
    pub fn current(&self) -> &str {
        &self.current
    }
}

fn is_all_caps(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}

/// Turns review text into claim registry rows
///
/// Every cited sentence yields one row per citation, each with a fresh claim
/// id. Lines after the reference list heading are not scanned.
#[derive(Debug, Clone, Default)]
pub struct ClaimExtractor {
    parser: CitationParser,
}

impl ClaimExtractor {
    /// Create an extractor
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract claim rows from one review
    pub fn extract(&self, review_id: &str, text: &str) -> Vec<ClaimRecord> {
        let references = ReferenceIndex::from_text(text);
        let mut sections = SectionTracker::new();
        let mut records = Vec::new();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if is_reference_heading(line) {
                break;
            }
            sections.observe(line);

            for sentence in split_sentences(line) {
                let citations = self.parser.parse(sentence);
                if citations.is_empty() {
                    continue;
                }
                let flags = classify(sentence);
                for citation in &citations {
                    let key = ClaimKey::new(review_id, sections.current(), ClaimKey::generate_id());
                    let mut record = ClaimRecord::from_citation(key, sentence, flags, citation);
                    record.in_reference_list = references.contains(&citation.author, &citation.year);
                    records.push(record);
                }
            }
        }

        debug!(
            "Extracted {} claim rows from review {} ({} reference entries)",
            records.len(),
            review_id,
            references.len()
        );
        records
    }
}
