//! Evidence module - scored text windows and per-claim evidence queries

use serde::{Deserialize, Serialize};

use crate::claim::ClaimRecord;

/// Which retrieval strategy produced a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStrategy {
    /// Page where a quoted span from the claim was found verbatim
    ExactQuote,
    /// Page derived from the stated page and the source's calibrated offset
    OffsetPage,
    /// Token-set similarity ranking
    Fuzzy,
}

impl EvidenceStrategy {
    /// Get the strategy name
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceStrategy::ExactQuote => "exact_quote",
            EvidenceStrategy::OffsetPage => "offset_page",
            EvidenceStrategy::Fuzzy => "fuzzy",
        }
    }

    /// Whether the strategy anchors on an explicit page signal
    pub fn is_anchor(&self) -> bool {
        !matches!(self, EvidenceStrategy::Fuzzy)
    }
}

/// A candidate evidence window
///
/// Transient: produced by retrieval and flattened into an [`EvidenceItem`]
/// for the evidence query record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceChunk {
    /// First physical page covered
    pub page_start: u32,
    /// Last physical page covered
    pub page_end: u32,
    /// Window text
    pub text: String,
    /// 0-100 score; anchored strategies always score 100
    pub score: u8,
    /// Strategy that proposed the window
    pub origin: EvidenceStrategy,
}

impl EvidenceChunk {
    /// Page range as `"N"` or `"N-M"`
    pub fn page_range(&self) -> String {
        if self.page_start == self.page_end {
            self.page_start.to_string()
        } else {
            format!("{}-{}", self.page_start, self.page_end)
        }
    }

    /// Flatten into the persisted evidence shape
    pub fn to_item(&self) -> EvidenceItem {
        EvidenceItem {
            page_range: self.page_range(),
            text: self.text.clone(),
            score: self.score,
        }
    }
}

/// One evidence entry in an evidence query record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// `"N"` or `"N-M"`
    pub page_range: String,
    /// Window text
    pub text: String,
    /// 0-100 score
    pub score: u8,
}

/// Per-claim retrieval output handed to a decision source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceQuery {
    /// Review document identifier
    pub review_id: String,
    /// Section label
    pub section: String,
    /// Claim identifier
    pub claim_id: String,
    /// Sentence text
    pub claim_text: String,
    /// Citation text as written
    pub citation_text: String,
    /// Citation form name
    pub citation_type: String,
    /// Citation is reported through a host source
    pub is_secondary: bool,
    /// Author named before "as cited in"
    pub primary_mentioned_author: String,
    /// Year named before "as cited in"
    pub primary_mentioned_year: String,
    /// Page locator from the citation
    pub stated_page: String,
    /// Cited (or host) author
    pub citation_author: String,
    /// Cited (or host) year
    pub citation_year: String,
    /// Resolved source file path
    pub source_pdf_path: String,
    /// Ranked evidence, best first
    pub evidence: Vec<EvidenceItem>,
}

impl EvidenceQuery {
    /// Build a query record for a claim row and its ranked evidence
    pub fn new(record: &ClaimRecord, evidence: Vec<EvidenceItem>) -> Self {
        Self {
            review_id: record.review_id.clone(),
            section: record.section.clone(),
            claim_id: record.claim_id.clone(),
            claim_text: record.claim_text.clone(),
            citation_text: record.citation_text.clone(),
            citation_type: record
                .citation_type
                .map(|k| k.as_str().to_string())
                .unwrap_or_default(),
            is_secondary: record.is_secondary,
            primary_mentioned_author: record.primary_mentioned_author.clone(),
            primary_mentioned_year: record.primary_mentioned_year.clone(),
            stated_page: record.stated_page.clone(),
            citation_author: record.citation_author.clone(),
            citation_year: record.citation_year.clone(),
            source_pdf_path: record.source_pdf_path.clone(),
            evidence,
        }
    }
}
