//! Running a decision source over evidence queries

use citeaudit_domain::{Decision, DecisionSource, EvidenceQuery};
use citeaudit_ledger::KeyedDecision;
use tracing::{info, warn};

/// Decide every query, mapping service failures to the failure sentinel
///
/// A failed call never drops the claim: it yields an `UNSUPPORTED_FAIL`
/// decision flagged `llm_error` so the ledger records the gap.
pub fn collect_decisions<S: DecisionSource>(source: &S, queries: &[EvidenceQuery]) -> Vec<KeyedDecision> {
    let mut failures = 0;
    let decisions: Vec<KeyedDecision> = queries
        .iter()
        .map(|query| {
            let decision = source.decide(query).unwrap_or_else(|e| {
                warn!("Decision failed for claim {}: {}", query.claim_id, e);
                failures += 1;
                Decision::service_failure(e)
            });
            KeyedDecision::new(query, decision)
        })
        .collect();

    info!("Collected {} decisions ({} failures)", decisions.len(), failures);
    decisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use citeaudit_domain::{Citation, CitationKind, ClaimFlags, ClaimKey, ClaimRecord, Span};

    struct Scripted;

    impl DecisionSource for Scripted {
        type Error = String;

        fn decide(&self, query: &EvidenceQuery) -> Result<Decision, Self::Error> {
            if query.evidence.is_empty() {
                return Err("no evidence supplied".to_string());
            }
            Ok(Decision {
                verdict: "SUPPORTED".to_string(),
                ..Default::default()
            })
        }
    }

    fn query(id: &str, evidence: usize) -> EvidenceQuery {
        let citation = Citation {
            citation_text: "(Smith, 2010)".to_string(),
            kind: CitationKind::Parenthetical,
            author: "Smith".to_string(),
            year: "2010".to_string(),
            stated_page: None,
            primary_mentioned_author: None,
            primary_mentioned_year: None,
            span: Span::new(0, 13),
        };
        let record = ClaimRecord::from_citation(ClaimKey::new("r", "s", id), "claim", ClaimFlags::default(), &citation);
        let items = (0..evidence)
            .map(|i| citeaudit_domain::EvidenceItem {
                page_range: (i + 1).to_string(),
                text: "text".to_string(),
                score: 90,
            })
            .collect();
        EvidenceQuery::new(&record, items)
    }

    #[test]
    fn test_failures_become_sentinel() {
        let decisions = collect_decisions(&Scripted, &[query("c1", 2), query("c2", 0)]);
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].decision.verdict, "SUPPORTED");
        assert_eq!(decisions[1].claim_id, "c2");
        assert!(decisions[1].decision.is_service_failure());
        assert_eq!(decisions[1].decision.rationale, "LLM error: no evidence supplied");
    }
}
