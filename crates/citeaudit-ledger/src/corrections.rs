//! Correction rows derived from a filled ledger

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::Ledger;

/// Kind of correction a row proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// A fix required by adjudication
    RequiredFix,
    /// A rewrite proposed for the claim sentence
    ProposedRewrite,
}

impl ActionType {
    /// Get the action name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::RequiredFix => "required_fix",
            ActionType::ProposedRewrite => "proposed_rewrite",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One correction for an author to act on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRow {
    /// Review document identifier
    pub review_id: String,
    /// Section label
    pub section: String,
    /// Claim identifier
    pub claim_id: String,
    /// Kind of correction
    pub action_type: ActionType,
    /// Fix or rewrite text
    pub proposed_text: String,
    /// Rationale (fixes) or rewrite notes (rewrites)
    pub notes: String,
}

/// Corrections for every non-blank required_fix and proposed_rewrite, in ledger order
pub fn corrections(ledger: &Ledger) -> Vec<CorrectionRow> {
    let mut rows = Vec::new();
    for record in ledger.iter() {
        let entries = [
            (ActionType::RequiredFix, &record.required_fix, &record.rationale),
            (ActionType::ProposedRewrite, &record.proposed_rewrite, &record.rewrite_notes),
        ];
        for (action_type, text, notes) in entries {
            if text.trim().is_empty() {
                continue;
            }
            rows.push(CorrectionRow {
                review_id: record.review_id.clone(),
                section: record.section.clone(),
                claim_id: record.claim_id.clone(),
                action_type,
                proposed_text: text.trim().to_string(),
                notes: notes.trim().to_string(),
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use citeaudit_domain::AdjudicationRecord;

    #[test]
    fn test_corrections_from_filled_fields() {
        let ledger = Ledger::from_records(vec![
            AdjudicationRecord {
                review_id: "r".to_string(),
                section: "s".to_string(),
                claim_id: "c1".to_string(),
                rationale: "Page 12 says otherwise.".to_string(),
                required_fix: "Cite page 14.".to_string(),
                proposed_rewrite: "Smith (2010, p. 14) reports...".to_string(),
                rewrite_notes: "narrowed claim".to_string(),
                ..Default::default()
            },
            AdjudicationRecord {
                review_id: "r".to_string(),
                section: "s".to_string(),
                claim_id: "c2".to_string(),
                required_fix: "  ".to_string(),
                ..Default::default()
            },
        ]);

        let rows = corrections(&ledger);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].action_type, ActionType::RequiredFix);
        assert_eq!(rows[0].notes, "Page 12 says otherwise.");
        assert_eq!(rows[1].action_type, ActionType::ProposedRewrite);
        assert_eq!(rows[1].notes, "narrowed claim");
        assert!(rows.iter().all(|r| r.claim_id == "c1"));
    }
}
