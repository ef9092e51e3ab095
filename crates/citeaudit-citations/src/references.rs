//! Reference list index for a review

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*#*\s*(references|bibliography)\s*:?\s*$").unwrap());

static ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\p{Lu}[\p{L}'’\-]+)[^()]*\(\s*(\d{4}[a-z]?)\s*\)").unwrap());

/// Whether a line opens the reference list
pub fn is_reference_heading(line: &str) -> bool {
    HEADING.is_match(line)
}

/// (first author, year) pairs listed in a review's reference section
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    entries: HashSet<(String, String)>,
}

impl ReferenceIndex {
    /// Index the entries after the first `References` or `Bibliography` heading
    ///
    /// Entries look like `Surname, A. B. (2010). Title...`. Text without the
    /// heading yields an empty index.
    pub fn from_text(text: &str) -> Self {
        let entries = text
            .lines()
            .skip_while(|line| !is_reference_heading(line))
            .skip(1)
            .filter_map(|line| {
                let caps = ENTRY.captures(line)?;
                Some((caps[1].to_lowercase(), caps[2].to_lowercase()))
            })
            .collect();
        Self { entries }
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a citation's first author and year appear in the list
    ///
    /// `None` when the review has no reference list to check against.
    pub fn contains(&self, author: &str, year: &str) -> Option<bool> {
        if self.entries.is_empty() {
            return None;
        }
        let key = (first_author_key(author), year.trim().to_lowercase());
        Some(self.entries.contains(&key))
    }
}

/// Lowercased first surname token of an author list
fn first_author_key(author: &str) -> String {
    let head = author.split(['&', ',', ';']).next().unwrap_or("");
    let head = head.split(" and ").next().unwrap_or("");
    head.split_whitespace()
        .find(|w| w.chars().next().map_or(false, char::is_uppercase))
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}
