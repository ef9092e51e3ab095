//! The adjudication ledger: one record per claim key

use citeaudit_domain::{AdjudicationRecord, ClaimKey, ClaimRecord, LedgerField};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::decision::DecisionRow;

/// Per-claim adjudication records in scaffold order
///
/// The key set is fixed when the ledger is built; merges only fill blank
/// fields of existing records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: Vec<AdjudicationRecord>,
    index: HashMap<ClaimKey, usize>,
}

impl Ledger {
    /// Build a blank ledger from the authoritative claim set
    ///
    /// Duplicate keys keep their first occurrence.
    pub fn scaffold(claims: &[ClaimRecord]) -> Self {
        let ledger = Self::from_records(claims.iter().map(AdjudicationRecord::scaffold));
        info!("Scaffolded ledger with {} records from {} claims", ledger.len(), claims.len());
        ledger
    }

    /// Build a ledger from existing records, keeping the first occurrence of each key
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AdjudicationRecord>,
    {
        let mut ledger = Self::default();
        let mut duplicates = 0;
        for record in records {
            let key = record.key();
            if ledger.index.contains_key(&key) {
                duplicates += 1;
                continue;
            }
            ledger.index.insert(key, ledger.records.len());
            ledger.records.push(record);
        }
        if duplicates > 0 {
            warn!("Dropped {} duplicate ledger keys", duplicates);
        }
        ledger
    }

    /// Record for a key
    pub fn get(&self, key: &ClaimKey) -> Option<&AdjudicationRecord> {
        self.index.get(key).map(|i| &self.records[*i])
    }

    /// Whether the key is part of the ledger
    pub fn contains(&self, key: &ClaimKey) -> bool {
        self.index.contains_key(key)
    }

    /// Fill blank fields of the keyed record from a decision row
    ///
    /// Returns the fields that went from blank to non-blank, or `None` when
    /// the key is not in the ledger.
    pub fn fill(&mut self, row: &DecisionRow) -> Option<Vec<LedgerField>> {
        let i = *self.index.get(&row.key)?;
        let record = &mut self.records[i];
        Some(
            row.values
                .iter()
                .filter(|(field, value)| record.fill_blank(*field, value))
                .map(|(field, _)| *field)
                .collect(),
        )
    }

    /// Records in scaffold order
    pub fn records(&self) -> &[AdjudicationRecord] {
        &self.records
    }

    /// Iterate over records in scaffold order
    pub fn iter(&self) -> impl Iterator<Item = &AdjudicationRecord> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records with a non-blank value in a field
    pub fn filled(&self, field: LedgerField) -> usize {
        self.records.iter().filter(|r| !r.get(field).trim().is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(claim_id: &str, verdict: &str) -> AdjudicationRecord {
        AdjudicationRecord {
            review_id: "r".to_string(),
            section: "s".to_string(),
            claim_id: claim_id.to_string(),
            verdict: verdict.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_records_keeps_first() {
        let ledger = Ledger::from_records(vec![record("c1", "A"), record("c2", ""), record("c1", "B")]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(&ClaimKey::new("r", "s", "c1")).unwrap().verdict, "A");
        assert_eq!(ledger.filled(LedgerField::Verdict), 1);
    }

    #[test]
    fn test_fill_reports_transitions() {
        let mut ledger = Ledger::from_records(vec![record("c1", "SUPPORTED")]);
        let row = DecisionRow {
            key: ClaimKey::new("r", "s", "c1"),
            values: vec![
                (LedgerField::Verdict, "UNSUPPORTED_FAIL".to_string()),
                (LedgerField::Rationale, "why".to_string()),
                (LedgerField::EvidenceSpan, String::new()),
            ],
        };
        assert_eq!(ledger.fill(&row), Some(vec![LedgerField::Rationale]));
        assert_eq!(ledger.records()[0].verdict, "SUPPORTED");
        assert_eq!(ledger.fill(&row), Some(vec![]));

        let stranger = DecisionRow {
            key: ClaimKey::new("r", "s", "zz"),
            values: vec![],
        };
        assert_eq!(ledger.fill(&stranger), None);
    }
}
