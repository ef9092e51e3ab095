//! Citation module - author/year occurrences found in a claim sentence

use serde::{Deserialize, Serialize};

/// The grammatical form a citation takes in the sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
    /// Author and year both inside parentheses: `(Smith, 2010)`
    Parenthetical,

    /// Author in running text, year in parentheses: `Smith (2010)`
    Narrative,

    /// Parenthetical form reported through a host: `(Smith, 1990, as cited in Jones, 2005)`
    SecondaryParenthetical,

    /// Narrative form reported through a host: `Smith (1990), as cited in Jones, 2005`
    SecondaryNarrative,
}

impl CitationKind {
    /// Get the kind name as it appears in claim records
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationKind::Parenthetical => "parenthetical",
            CitationKind::Narrative => "narrative",
            CitationKind::SecondaryParenthetical => "secondary_parenthetical",
            CitationKind::SecondaryNarrative => "secondary_narrative",
        }
    }

    /// Parse a kind from its record name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "parenthetical" => Some(CitationKind::Parenthetical),
            "narrative" => Some(CitationKind::Narrative),
            "secondary_parenthetical" => Some(CitationKind::SecondaryParenthetical),
            "secondary_narrative" => Some(CitationKind::SecondaryNarrative),
            _ => None,
        }
    }

    /// Whether the cited work is only known through a host source
    pub fn is_secondary(&self) -> bool {
        matches!(
            self,
            CitationKind::SecondaryParenthetical | CitationKind::SecondaryNarrative
        )
    }
}

impl std::str::FromStr for CitationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid citation type: {}", s))
    }
}

impl std::fmt::Display for CitationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte range of a citation within its sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a span from start and end offsets
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Slice the span out of the sentence it was taken from
    pub fn slice<'a>(&self, sentence: &'a str) -> &'a str {
        sentence.get(self.start..self.end).unwrap_or("")
    }
}

/// A single citation occurrence
///
/// For secondary forms `author`/`year` name the host source and the
/// `primary_mentioned_*` fields name the work reported through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Citation text as written (the parenthetical block, or the narrative match)
    pub citation_text: String,

    /// Grammatical form
    pub kind: CitationKind,

    /// Author string as written, e.g. `Johnson et al.`
    pub author: String,

    /// Year string as written, including any disambiguation letter
    pub year: String,

    /// Page locator such as `12` or `12-14`
    pub stated_page: Option<String>,

    /// Author named before "as cited in"
    pub primary_mentioned_author: Option<String>,

    /// Year named before "as cited in"
    pub primary_mentioned_year: Option<String>,

    /// Position of the citation in its sentence
    pub span: Span,
}

impl Citation {
    /// Whether this citation is reported through a host source
    pub fn is_secondary(&self) -> bool {
        self.kind.is_secondary()
    }

    /// Key used to drop repeated detections of the same occurrence
    pub fn dedup_key(&self) -> (&str, &str, CitationKind, Span) {
        (&self.author, &self.year, self.kind, self.span)
    }
}
