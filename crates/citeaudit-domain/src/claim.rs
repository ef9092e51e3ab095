//! Claim module - sentence-level assertions and their registry rows

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::citation::{Citation, CitationKind};

/// Identity of a claim: (review_id, section, claim_id)
///
/// This is the key of the adjudication ledger. Two rows with the same key are
/// the same claim no matter what else differs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClaimKey {
    /// Review document identifier
    pub review_id: String,
    /// Section label the claim was extracted under
    pub section: String,
    /// Claim identifier, unique within the review
    pub claim_id: String,
}

impl ClaimKey {
    /// Create a key from its three parts
    pub fn new(
        review_id: impl Into<String>,
        section: impl Into<String>,
        claim_id: impl Into<String>,
    ) -> Self {
        Self {
            review_id: review_id.into(),
            section: section.into(),
            claim_id: claim_id.into(),
        }
    }

    /// Generate a fresh UUIDv7 claim identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use citeaudit_domain::ClaimKey;
    ///
    /// let a = ClaimKey::generate_id();
    /// let b = ClaimKey::generate_id();
    /// assert_ne!(a, b);
    /// ```
    pub fn generate_id() -> String {
        uuid::Uuid::now_v7().to_string()
    }
}

impl fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.review_id, self.section, self.claim_id)
    }
}

/// Review priority of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Quotes, numbers, or causal/normative language
    #[serde(alias = "high", alias = "HIGH")]
    High,
    /// Everything else
    #[default]
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

impl Priority {
    /// Get the priority name as written in claim records
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Low => "Low",
        }
    }
}

/// Heuristic flags computed from a claim's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClaimFlags {
    /// Text contains a quoted span
    pub is_quote: bool,
    /// Text contains a digit
    pub has_numbers: bool,
    /// Text uses causal or normative language
    pub is_causal_or_normative: bool,
}

impl ClaimFlags {
    /// Claims carrying any flag are reviewed first
    pub fn priority(&self) -> Priority {
        if self.is_quote || self.has_numbers || self.is_causal_or_normative {
            Priority::High
        } else {
            Priority::Low
        }
    }
}

/// One row of the claim registry: a claim paired with one of its citations
///
/// Field order matches the registry file layout. The trailing section fields
/// are blank until section assignment has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Review document identifier
    pub review_id: String,
    /// Section label the claim was extracted under
    pub section: String,
    /// Claim identifier
    pub claim_id: String,
    /// Sentence text
    pub claim_text: String,
    /// Text contains a quoted span
    #[serde(deserialize_with = "de_flag")]
    pub is_quote: bool,
    /// Text contains a digit
    #[serde(deserialize_with = "de_flag")]
    pub has_numbers: bool,
    /// Text uses causal or normative language
    #[serde(deserialize_with = "de_flag")]
    pub is_causal_or_normative: bool,
    /// Citation text as written
    pub citation_text: String,
    /// Citation form
    #[serde(default, deserialize_with = "de_kind")]
    pub citation_type: Option<CitationKind>,
    /// Cited (or host) author
    pub citation_author: String,
    /// Cited (or host) year
    pub citation_year: String,
    /// Citation is reported through a host source
    #[serde(deserialize_with = "de_flag")]
    pub is_secondary: bool,
    /// Author named before "as cited in"
    #[serde(default)]
    pub primary_mentioned_author: String,
    /// Year named before "as cited in"
    #[serde(default)]
    pub primary_mentioned_year: String,
    /// Page locator from the citation
    #[serde(default)]
    pub stated_page: String,
    /// Whether the citation appears in the review's reference list; blank when unknown
    #[serde(default, deserialize_with = "de_optional_flag")]
    pub in_reference_list: Option<bool>,
    /// Resolved source file path; blank when unresolved
    #[serde(default)]
    pub source_pdf_path: String,
    /// Review priority
    #[serde(default)]
    pub priority: Priority,
    /// Assigned section heading
    #[serde(default)]
    pub section_title: String,
    /// Assigned section heading level
    #[serde(default)]
    pub section_level: Option<u8>,
    /// First level-1 heading of the review
    #[serde(default)]
    pub research_question: String,
}

impl ClaimRecord {
    /// Build a registry row from a parsed citation
    pub fn from_citation(key: ClaimKey, claim_text: &str, flags: ClaimFlags, citation: &Citation) -> Self {
        Self {
            review_id: key.review_id,
            section: key.section,
            claim_id: key.claim_id,
            claim_text: claim_text.to_string(),
            is_quote: flags.is_quote,
            has_numbers: flags.has_numbers,
            is_causal_or_normative: flags.is_causal_or_normative,
            citation_text: citation.citation_text.clone(),
            citation_type: Some(citation.kind),
            citation_author: citation.author.clone(),
            citation_year: citation.year.clone(),
            is_secondary: citation.is_secondary(),
            primary_mentioned_author: citation.primary_mentioned_author.clone().unwrap_or_default(),
            primary_mentioned_year: citation.primary_mentioned_year.clone().unwrap_or_default(),
            stated_page: citation.stated_page.clone().unwrap_or_default(),
            in_reference_list: None,
            source_pdf_path: String::new(),
            priority: flags.priority(),
            section_title: String::new(),
            section_level: None,
            research_question: String::new(),
        }
    }

    /// The ledger key for this row
    pub fn key(&self) -> ClaimKey {
        ClaimKey::new(&self.review_id, &self.section, &self.claim_id)
    }

    /// The text flags of this row
    pub fn flags(&self) -> ClaimFlags {
        ClaimFlags {
            is_quote: self.is_quote,
            has_numbers: self.has_numbers,
            is_causal_or_normative: self.is_causal_or_normative,
        }
    }

    /// Whether a source file has been resolved for this row
    pub fn is_resolved(&self) -> bool {
        !self.source_pdf_path.trim().is_empty()
    }
}

/// Interpret a spreadsheet-style truth value
///
/// Accepts `true/false`, `1/0`, `yes/no`, `y/n`, `t/f` in any case. Anything
/// else, including blank, is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "t"
    )
}

fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = FlagValue::deserialize(deserializer)?;
    Ok(raw.as_bool())
}

fn de_optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<FlagValue>::deserialize(deserializer)?;
    Ok(match raw {
        Some(FlagValue::Text(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v.as_bool()),
        None => None,
    })
}

fn de_kind<'de, D>(deserializer: D) -> Result<Option<CitationKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| CitationKind::parse(&s)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FlagValue {
    fn as_bool(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Int(i) => *i != 0,
            FlagValue::Text(s) => parse_flag(s),
        }
    }
}
