//! Year selection for multi-citation strings

use citeaudit_domain::ClaimRecord;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::{normalize, strip_lead_in};

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}[a-z]?\b").unwrap());

/// Split a citation string into its semicolon-separated sub-citations
pub fn citation_parts(citation_text: &str) -> Vec<&str> {
    let text = citation_text.trim();
    let text = text.strip_prefix('(').unwrap_or(text);
    let text = text.strip_suffix(')').unwrap_or(text);
    text.split(';').map(str::trim).filter(|p| !p.is_empty()).collect()
}

/// First year appearing anywhere in the text
pub fn first_year(text: &str) -> Option<String> {
    YEAR.find(text).map(|m| m.as_str().to_lowercase())
}

/// Year attached to `author` among the sub-citations of `citation_text`
///
/// Each sub-citation's author span (the text before its first year) is
/// normalized and compared with the normalized author. Returns `None` when
/// no sub-citation belongs to the author, so an unrelated year is never
/// borrowed.
///
/// # Examples
///
/// ```
/// use citeaudit_resolver::infer_year_for_author;
///
/// let text = "(Chirau et al., 2022; Kanyamuna et al., 2018)";
/// assert_eq!(infer_year_for_author("Chirau et al.", text).as_deref(), Some("2022"));
/// assert_eq!(infer_year_for_author("Kanyamuna et al.", text).as_deref(), Some("2018"));
/// assert_eq!(infer_year_for_author("Patton", text), None);
/// ```
pub fn infer_year_for_author(author: &str, citation_text: &str) -> Option<String> {
    let target = normalize(author);
    if target.is_empty() {
        return None;
    }
    citation_parts(citation_text).into_iter().find_map(|part| {
        let year = YEAR.find(part)?;
        let head = strip_lead_in(&part[..year.start()]);
        (normalize(head) == target).then(|| year.as_str().to_lowercase())
    })
}

/// Four-digit numeric year at the start of a year string (`2010a` → 2010)
pub fn year_number(year: &str) -> Option<u16> {
    let digits = year.trim().get(..4)?;
    if digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

/// The (author, year) a claim row should be resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTarget {
    /// Author string to normalize
    pub author: String,
    /// Year string, if one could be determined
    pub year: Option<String>,
    /// Whether this target is the primary work of a secondary citation
    pub is_primary_of_secondary: bool,
}

impl ResolutionTarget {
    /// Targets for a claim row, most specific first
    ///
    /// A secondary citation that names its primary work targets that work
    /// first and the host second. The year is the one attached to the
    /// author inside citation_text, falling back to the stated year and then
    /// to the first year in citation_text.
    pub fn for_record(record: &ClaimRecord) -> Vec<Self> {
        let mut targets = Vec::new();
        let primary_author = record.primary_mentioned_author.trim();
        let primary_year = record.primary_mentioned_year.trim();
        if record.is_secondary && !primary_author.is_empty() && !primary_year.is_empty() {
            targets.push(Self::build(primary_author, primary_year, &record.citation_text, true));
        }
        targets.push(Self::build(
            record.citation_author.trim(),
            record.citation_year.trim(),
            &record.citation_text,
            false,
        ));
        targets
    }

    fn build(author: &str, stated_year: &str, citation_text: &str, primary: bool) -> Self {
        let year = infer_year_for_author(author, citation_text)
            .or_else(|| (!stated_year.is_empty()).then(|| stated_year.to_lowercase()))
            .or_else(|| first_year(citation_text));
        Self {
            author: author.to_string(),
            year,
            is_primary_of_secondary: primary,
        }
    }
}
