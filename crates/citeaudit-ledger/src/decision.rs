//! Decision rows read from external decision sources

use citeaudit_domain::{AdjudicationRecord, ClaimKey, Decision, EvidenceQuery, LedgerField, RewriteProposal};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Which ledger fields a decision source supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    /// Verdicts with rationale, evidence span and required fix
    Adjudication,
    /// Proposed rewrites with notes
    Rewrite,
}

impl DecisionKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Adjudication => "adjudication",
            DecisionKind::Rewrite => "rewrite",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "adjudication" => Some(DecisionKind::Adjudication),
            "rewrite" => Some(DecisionKind::Rewrite),
            _ => None,
        }
    }

    /// Source JSON key and the ledger field it fills
    pub fn mapping(&self) -> &'static [(&'static str, LedgerField)] {
        match self {
            DecisionKind::Adjudication => &[
                ("verdict", LedgerField::Verdict),
                ("rationale", LedgerField::Rationale),
                ("evidence_span", LedgerField::EvidenceSpan),
                ("required_fix", LedgerField::RequiredFix),
                ("risk_flags", LedgerField::RiskFlags),
                ("page_anchor", LedgerField::PageAnchor),
            ],
            DecisionKind::Rewrite => &[
                ("proposed_rewrite", LedgerField::ProposedRewrite),
                ("page_anchor", LedgerField::PageAnchor),
                ("notes", LedgerField::RewriteNotes),
                ("risk_flags", LedgerField::RewriteFlags),
            ],
        }
    }
}

impl FromStr for DecisionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid decision kind: {}", s))
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flatten a JSON value into ledger text
///
/// Null is blank, arrays are `;`-joined, other scalars use their text form.
pub fn json_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(json_text)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(";"),
        other => other.to_string(),
    }
}

/// One keyed row from a decision source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRow {
    /// Claim the row decides
    pub key: ClaimKey,
    /// Ledger values in mapping order; blank values are kept
    pub values: Vec<(LedgerField, String)>,
}

impl DecisionRow {
    /// Read a row from a JSON object
    ///
    /// Returns `None` when the value is not an object or lacks any key field.
    pub fn from_json(kind: DecisionKind, value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let key_part = |name: &str| {
            let text = json_text(object.get(name)?);
            (!text.trim().is_empty()).then_some(text)
        };
        let key = ClaimKey::new(key_part("review_id")?, key_part("section")?, key_part("claim_id")?);

        let values = kind
            .mapping()
            .iter()
            .map(|(name, field)| (*field, object.get(*name).map(json_text).unwrap_or_default()))
            .collect();
        Some(Self { key, values })
    }

    /// Row for an adjudication decision
    pub fn from_decision(key: ClaimKey, decision: &Decision) -> Self {
        Self {
            key,
            values: vec![
                (LedgerField::Verdict, decision.verdict.clone()),
                (LedgerField::Rationale, decision.rationale.clone()),
                (LedgerField::EvidenceSpan, decision.evidence_span.clone()),
                (LedgerField::RequiredFix, decision.required_fix.clone()),
                (LedgerField::RiskFlags, decision.joined_flags()),
                (LedgerField::PageAnchor, decision.page_anchor.clone()),
            ],
        }
    }

    /// Row carrying every decision field of an existing ledger record
    pub fn from_record(record: &AdjudicationRecord) -> Self {
        Self {
            key: record.key(),
            values: LedgerField::ALL
                .iter()
                .map(|field| (*field, record.get(*field).to_string()))
                .collect(),
        }
    }

    /// Row for a rewrite proposal
    pub fn from_rewrite(key: ClaimKey, proposal: &RewriteProposal) -> Self {
        Self {
            key,
            values: vec![
                (LedgerField::ProposedRewrite, proposal.proposed_rewrite.clone()),
                (LedgerField::PageAnchor, proposal.page_anchor.clone()),
                (LedgerField::RewriteNotes, proposal.notes.clone()),
                (LedgerField::RewriteFlags, proposal.risk_flags.join(";")),
            ],
        }
    }
}

/// A decision keyed by its claim, as written to decision JSONL files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedDecision {
    /// Review document identifier
    pub review_id: String,
    /// Section label
    pub section: String,
    /// Claim identifier
    pub claim_id: String,
    /// The decision
    #[serde(flatten)]
    pub decision: Decision,
}

impl KeyedDecision {
    /// Attach a decision to the claim of an evidence query
    pub fn new(query: &EvidenceQuery, decision: Decision) -> Self {
        Self {
            review_id: query.review_id.clone(),
            section: query.section.clone(),
            claim_id: query.claim_id.clone(),
            decision,
        }
    }

    /// The claim key
    pub fn key(&self) -> ClaimKey {
        ClaimKey::new(&self.review_id, &self.section, &self.claim_id)
    }

    /// Convert into a mergeable row
    pub fn to_row(&self) -> DecisionRow {
        DecisionRow::from_decision(self.key(), &self.decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_text() {
        assert_eq!(json_text(&json!(null)), "");
        assert_eq!(json_text(&json!("x")), "x");
        assert_eq!(json_text(&json!(["a", "", "b"])), "a;b");
        assert_eq!(json_text(&json!(12)), "12");
        assert_eq!(json_text(&json!(true)), "true");
    }

    #[test]
    fn test_adjudication_row_from_json() {
        let value = json!({
            "review_id": "r1", "section": "findings", "claim_id": "c1",
            "verdict": "SUPPORTED", "rationale": null,
            "risk_flags": ["page_mismatch", "secondary"],
            "proposed_rewrite": "ignored for this kind"
        });
        let row = DecisionRow::from_json(DecisionKind::Adjudication, &value).unwrap();
        assert_eq!(row.key, ClaimKey::new("r1", "findings", "c1"));
        assert!(row.values.contains(&(LedgerField::Verdict, "SUPPORTED".to_string())));
        assert!(row.values.contains(&(LedgerField::Rationale, String::new())));
        assert!(row.values.contains(&(LedgerField::RiskFlags, "page_mismatch;secondary".to_string())));
        assert!(row.values.iter().all(|(f, _)| *f != LedgerField::ProposedRewrite));
    }

    #[test]
    fn test_rewrite_row_maps_notes_and_flags() {
        let value = json!({
            "review_id": "r1", "section": "s", "claim_id": "c1",
            "proposed_rewrite": "Say less.", "notes": "overstated", "risk_flags": ["tone"]
        });
        let row = DecisionRow::from_json(DecisionKind::Rewrite, &value).unwrap();
        assert!(row.values.contains(&(LedgerField::RewriteNotes, "overstated".to_string())));
        assert!(row.values.contains(&(LedgerField::RewriteFlags, "tone".to_string())));
    }

    #[test]
    fn test_row_requires_key() {
        let value = json!({"review_id": "r1", "section": "s", "verdict": "X"});
        assert!(DecisionRow::from_json(DecisionKind::Adjudication, &value).is_none());
        assert!(DecisionRow::from_json(DecisionKind::Adjudication, &json!([1, 2])).is_none());
    }

    #[test]
    fn test_row_from_record() {
        let record = AdjudicationRecord {
            review_id: "r".to_string(),
            section: "s".to_string(),
            claim_id: "c".to_string(),
            verdict: "SUPPORTED".to_string(),
            ..Default::default()
        };
        let row = DecisionRow::from_record(&record);
        assert_eq!(row.values.len(), LedgerField::ALL.len());
        assert_eq!(row.values[0], (LedgerField::Verdict, "SUPPORTED".to_string()));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Rewrite".parse::<DecisionKind>(), Ok(DecisionKind::Rewrite));
        assert!("other".parse::<DecisionKind>().is_err());
    }

    #[test]
    fn test_keyed_decision_flattens() {
        let keyed = KeyedDecision {
            review_id: "r".to_string(),
            section: "s".to_string(),
            claim_id: "c".to_string(),
            decision: Decision::service_failure("timeout"),
        };
        let value = serde_json::to_value(&keyed).unwrap();
        assert_eq!(value["verdict"], "UNSUPPORTED_FAIL");
        let row = DecisionRow::from_json(DecisionKind::Adjudication, &value).unwrap();
        assert_eq!(row, keyed.to_row());
    }
}
