//! Ledger module - adjudication records and the decisions that fill them

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::claim::{ClaimKey, ClaimRecord};

/// Verdict recorded for a claim
///
/// The ledger stores verdicts as plain text so any label a decision source
/// emits can be carried. This type only classifies the labels the pipeline
/// itself acts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Cited source does not support the claim, or the decision service failed
    UnsupportedFail,
    /// Evidence is inconclusive and needs a human
    AmbiguousReview,
    /// Any other label
    Other(String),
}

impl Verdict {
    /// Label written by the decision-service failure sentinel
    pub const UNSUPPORTED_FAIL: &'static str = "UNSUPPORTED_FAIL";
    /// Label for inconclusive evidence
    pub const AMBIGUOUS_REVIEW: &'static str = "AMBIGUOUS_REVIEW";

    /// Classify a verdict label; blank labels have no verdict
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s {
            "" => None,
            Self::UNSUPPORTED_FAIL => Some(Verdict::UnsupportedFail),
            Self::AMBIGUOUS_REVIEW => Some(Verdict::AmbiguousReview),
            other => Some(Verdict::Other(other.to_string())),
        }
    }

    /// Get the label
    pub fn as_str(&self) -> &str {
        match self {
            Verdict::UnsupportedFail => Self::UNSUPPORTED_FAIL,
            Verdict::AmbiguousReview => Self::AMBIGUOUS_REVIEW,
            Verdict::Other(s) => s,
        }
    }

    /// Whether the claim needs a correction
    pub fn needs_correction(&self) -> bool {
        matches!(self, Verdict::UnsupportedFail | Verdict::AmbiguousReview)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fillable fields of an adjudication record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LedgerField {
    /// Verdict label
    Verdict,
    /// Why the verdict was reached
    Rationale,
    /// Quoted supporting (or contradicting) text
    EvidenceSpan,
    /// Correction the review must make
    RequiredFix,
    /// Semicolon-joined risk flags
    RiskFlags,
    /// Suggested replacement sentence
    ProposedRewrite,
    /// Page the rewrite is anchored to
    PageAnchor,
    /// Notes accompanying the rewrite
    RewriteNotes,
    /// Semicolon-joined flags accompanying the rewrite
    RewriteFlags,
}

impl LedgerField {
    /// Every fillable field, in ledger column order
    pub const ALL: [LedgerField; 9] = [
        LedgerField::Verdict,
        LedgerField::Rationale,
        LedgerField::EvidenceSpan,
        LedgerField::RequiredFix,
        LedgerField::RiskFlags,
        LedgerField::ProposedRewrite,
        LedgerField::PageAnchor,
        LedgerField::RewriteNotes,
        LedgerField::RewriteFlags,
    ];

    /// Column name in the ledger file
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerField::Verdict => "verdict",
            LedgerField::Rationale => "rationale",
            LedgerField::EvidenceSpan => "evidence_span",
            LedgerField::RequiredFix => "required_fix",
            LedgerField::RiskFlags => "risk_flags",
            LedgerField::ProposedRewrite => "proposed_rewrite",
            LedgerField::PageAnchor => "page_anchor",
            LedgerField::RewriteNotes => "rewrite_notes",
            LedgerField::RewriteFlags => "rewrite_flags",
        }
    }

    /// Parse a column name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == s.trim())
    }
}

impl fmt::Display for LedgerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a ledger value counts as blank
///
/// Absent values never reach the record, so blank here means empty or
/// whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// One row of the adjudication ledger
///
/// Field order is the ledger file's column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdjudicationRecord {
    /// Review document identifier
    pub review_id: String,
    /// Section label
    pub section: String,
    /// Claim identifier
    pub claim_id: String,
    /// Sentence text
    #[serde(default)]
    pub claim_text: String,
    /// Cited author
    #[serde(default)]
    pub citation_author: String,
    /// Cited year
    #[serde(default)]
    pub citation_year: String,
    /// Resolved source file path
    #[serde(default)]
    pub source_pdf_path: String,
    /// Verdict label
    #[serde(default)]
    pub verdict: String,
    /// Why the verdict was reached
    #[serde(default)]
    pub rationale: String,
    /// Quoted evidence
    #[serde(default)]
    pub evidence_span: String,
    /// Correction the review must make
    #[serde(default)]
    pub required_fix: String,
    /// Semicolon-joined risk flags
    #[serde(default)]
    pub risk_flags: String,
    /// Suggested replacement sentence
    #[serde(default)]
    pub proposed_rewrite: String,
    /// Page the rewrite is anchored to
    #[serde(default)]
    pub page_anchor: String,
    /// Notes accompanying the rewrite
    #[serde(default)]
    pub rewrite_notes: String,
    /// Semicolon-joined flags accompanying the rewrite
    #[serde(default)]
    pub rewrite_flags: String,
}

impl AdjudicationRecord {
    /// Ledger column names in file order
    pub const COLUMNS: [&'static str; 16] = [
        "review_id",
        "section",
        "claim_id",
        "claim_text",
        "citation_author",
        "citation_year",
        "source_pdf_path",
        "verdict",
        "rationale",
        "evidence_span",
        "required_fix",
        "risk_flags",
        "proposed_rewrite",
        "page_anchor",
        "rewrite_notes",
        "rewrite_flags",
    ];

    /// Blank record for a claim row; context columns are copied, decision columns left blank
    pub fn scaffold(claim: &ClaimRecord) -> Self {
        Self {
            review_id: claim.review_id.clone(),
            section: claim.section.clone(),
            claim_id: claim.claim_id.clone(),
            claim_text: claim.claim_text.clone(),
            citation_author: claim.citation_author.clone(),
            citation_year: claim.citation_year.clone(),
            source_pdf_path: claim.source_pdf_path.clone(),
            ..Default::default()
        }
    }

    /// The ledger key
    pub fn key(&self) -> ClaimKey {
        ClaimKey::new(&self.review_id, &self.section, &self.claim_id)
    }

    /// Read a fillable field
    pub fn get(&self, field: LedgerField) -> &str {
        match field {
            LedgerField::Verdict => &self.verdict,
            LedgerField::Rationale => &self.rationale,
            LedgerField::EvidenceSpan => &self.evidence_span,
            LedgerField::RequiredFix => &self.required_fix,
            LedgerField::RiskFlags => &self.risk_flags,
            LedgerField::ProposedRewrite => &self.proposed_rewrite,
            LedgerField::PageAnchor => &self.page_anchor,
            LedgerField::RewriteNotes => &self.rewrite_notes,
            LedgerField::RewriteFlags => &self.rewrite_flags,
        }
    }

    fn slot(&mut self, field: LedgerField) -> &mut String {
        match field {
            LedgerField::Verdict => &mut self.verdict,
            LedgerField::Rationale => &mut self.rationale,
            LedgerField::EvidenceSpan => &mut self.evidence_span,
            LedgerField::RequiredFix => &mut self.required_fix,
            LedgerField::RiskFlags => &mut self.risk_flags,
            LedgerField::ProposedRewrite => &mut self.proposed_rewrite,
            LedgerField::PageAnchor => &mut self.page_anchor,
            LedgerField::RewriteNotes => &mut self.rewrite_notes,
            LedgerField::RewriteFlags => &mut self.rewrite_flags,
        }
    }

    /// Fill a field only if it is currently blank and the value is not
    ///
    /// Returns true when the field went from blank to non-blank.
    pub fn fill_blank(&mut self, field: LedgerField, value: &str) -> bool {
        if is_blank(value) {
            return false;
        }
        let slot = self.slot(field);
        if !is_blank(slot) {
            return false;
        }
        *slot = value.to_string();
        true
    }

    /// Classified verdict, if any
    pub fn verdict(&self) -> Option<Verdict> {
        Verdict::parse(&self.verdict)
    }

    /// Individual risk flags
    pub fn risk_flag_list(&self) -> Vec<&str> {
        split_flags(&self.risk_flags)
    }
}

/// Split a semicolon-joined flag list, dropping blanks
pub fn split_flags(joined: &str) -> Vec<&str> {
    joined
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Output of an adjudication decision source for one claim
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Decision {
    /// Verdict label
    #[serde(default)]
    pub verdict: String,
    /// Why the verdict was reached
    #[serde(default)]
    pub rationale: String,
    /// Quoted evidence
    #[serde(default)]
    pub evidence_span: String,
    /// Correction the review must make
    #[serde(default)]
    pub required_fix: String,
    /// Risk flags
    #[serde(default)]
    pub risk_flags: Vec<String>,
    /// Page the decision is anchored to
    #[serde(default)]
    pub page_anchor: String,
}

impl Decision {
    /// Risk flag attached to the service failure sentinel
    pub const SERVICE_FAILURE_FLAG: &'static str = "llm_error";

    /// Sentinel decision for a decision service that could not answer
    ///
    /// # Examples
    ///
    /// ```
    /// use citeaudit_domain::Decision;
    ///
    /// let d = Decision::service_failure("timeout");
    /// assert_eq!(d.verdict, "UNSUPPORTED_FAIL");
    /// assert!(d.is_service_failure());
    /// ```
    pub fn service_failure(reason: impl fmt::Display) -> Self {
        Self {
            verdict: Verdict::UNSUPPORTED_FAIL.to_string(),
            rationale: format!("LLM error: {}", reason),
            risk_flags: vec![Self::SERVICE_FAILURE_FLAG.to_string()],
            ..Default::default()
        }
    }

    /// Whether this decision is the failure sentinel
    pub fn is_service_failure(&self) -> bool {
        self.risk_flags.iter().any(|f| f == Self::SERVICE_FAILURE_FLAG)
    }

    /// Semicolon-joined risk flags
    pub fn joined_flags(&self) -> String {
        self.risk_flags.join(";")
    }
}

/// Output of a rewrite decision source for one claim
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewriteProposal {
    /// Suggested replacement sentence
    #[serde(default)]
    pub proposed_rewrite: String,
    /// Page the rewrite is anchored to
    #[serde(default)]
    pub page_anchor: String,
    /// Notes accompanying the rewrite
    #[serde(default)]
    pub notes: String,
    /// Flags accompanying the rewrite
    #[serde(default)]
    pub risk_flags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_blank_only_fills_blank() {
        let mut record = AdjudicationRecord::default();
        assert!(record.fill_blank(LedgerField::Verdict, "SUPPORTED"));
        assert!(!record.fill_blank(LedgerField::Verdict, "UNSUPPORTED_FAIL"));
        assert_eq!(record.verdict, "SUPPORTED");
    }

    #[test]
    fn test_fill_blank_ignores_blank_values() {
        let mut record = AdjudicationRecord::default();
        assert!(!record.fill_blank(LedgerField::Rationale, "   "));
        assert_eq!(record.rationale, "");
    }

    #[test]
    fn test_whitespace_slot_counts_as_blank() {
        let mut record = AdjudicationRecord {
            rationale: "  ".to_string(),
            ..Default::default()
        };
        assert!(record.fill_blank(LedgerField::Rationale, "because"));
        assert_eq!(record.get(LedgerField::Rationale), "because");
    }

    #[test]
    fn test_field_names_match_columns() {
        for field in LedgerField::ALL {
            assert!(AdjudicationRecord::COLUMNS.contains(&field.as_str()));
            assert_eq!(LedgerField::parse(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_service_failure_sentinel() {
        let decision = Decision::service_failure("rate limited");
        assert_eq!(decision.verdict, Verdict::UNSUPPORTED_FAIL);
        assert_eq!(decision.rationale, "LLM error: rate limited");
        assert_eq!(decision.joined_flags(), "llm_error");
        assert!(decision.is_service_failure());
        assert!(Verdict::parse(&decision.verdict).unwrap().needs_correction());
    }

    #[test]
    fn test_verdict_classification() {
        assert_eq!(Verdict::parse(""), None);
        assert_eq!(Verdict::parse("AMBIGUOUS_REVIEW"), Some(Verdict::AmbiguousReview));
        let other = Verdict::parse("SUPPORTED").unwrap();
        assert!(!other.needs_correction());
        assert_eq!(other.as_str(), "SUPPORTED");
    }

    #[test]
    fn test_split_flags() {
        assert_eq!(split_flags("a; b;;c "), vec!["a", "b", "c"]);
        assert!(split_flags("").is_empty());
    }
}
