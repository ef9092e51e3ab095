//! Human review sampling plan
//!
//! Picks which claims a reviewer checks by hand: every High-priority claim,
//! a deterministic sample of Low-priority claims, and a per-section flag to
//! review the whole section when too many of its verdicts need correction.

use citeaudit_domain::{ClaimRecord, Priority, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::ledger::Ledger;

/// Settings for building a sampling plan
///
/// # Examples
///
/// ```
/// use citeaudit_ledger::SamplingConfig;
///
/// let config = SamplingConfig::default();
/// assert_eq!(config.low_sample_size(40), 12);
/// assert_eq!(config.low_sample_size(5), 5);
/// assert_eq!(config.low_sample_size(0), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Share of Low-priority claims sampled per section
    #[serde(default = "default_low_sample_fraction")]
    pub low_sample_fraction: f64,

    /// Minimum Low-priority sample per section (capped at what exists)
    #[serde(default = "default_min_low_sample")]
    pub min_low_sample: usize,

    /// Correction-verdict rate above which the whole section is escalated
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold: f64,
}

fn default_low_sample_fraction() -> f64 {
    0.3
}

fn default_min_low_sample() -> usize {
    10
}

fn default_escalation_threshold() -> f64 {
    0.05
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            low_sample_fraction: default_low_sample_fraction(),
            min_low_sample: default_min_low_sample(),
            escalation_threshold: default_escalation_threshold(),
        }
    }
}

impl SamplingConfig {
    /// Number of Low-priority claims sampled from `available`
    ///
    /// `max(min_low_sample, floor(available * fraction))`, never more than available.
    pub fn low_sample_size(&self, available: usize) -> usize {
        if available == 0 {
            return 0;
        }
        let by_fraction = (available as f64 * self.low_sample_fraction).floor() as usize;
        by_fraction.max(self.min_low_sample).min(available)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.low_sample_fraction) {
            return Err("low_sample_fraction must be between 0.0 and 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.escalation_threshold) {
            return Err("escalation_threshold must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

/// One claim selected for human review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRow {
    /// Review document identifier
    pub review_id: String,
    /// Section label
    pub section: String,
    /// Claim identifier
    pub claim_id: String,
    /// Claim priority
    pub priority: Priority,
    /// Whether the section's correction rate calls for reviewing every claim in it
    pub escalate_to_full_section: bool,
}

/// Share of adjudicated records in a section whose verdict needs correction
///
/// Records without a verdict are not counted. `None` when nothing in the
/// section has been adjudicated.
pub fn correction_rate(ledger: &Ledger, review_id: &str, section: &str) -> Option<f64> {
    let verdicts: Vec<Verdict> = ledger
        .iter()
        .filter(|r| r.review_id == review_id && r.section == section)
        .filter_map(|r| r.verdict())
        .collect();
    if verdicts.is_empty() {
        return None;
    }
    let bad = verdicts.iter().filter(|v| v.needs_correction()).count();
    Some(bad as f64 / verdicts.len() as f64)
}

/// Evenly spaced picks of `n` items, keeping their order
fn spread<T>(items: &[T], n: usize) -> Vec<&T> {
    let len = items.len();
    (0..n.min(len)).map(|i| &items[i * len / n]).collect()
}

/// Build the review plan for a claim set and its ledger
///
/// Sections are visited in (review_id, section) order; within a section the
/// High-priority claims come first, then the Low-priority sample, each in
/// claim order. The sample is deterministic: picks are spread evenly over
/// the section's Low-priority claims.
pub fn sampling_plan(claims: &[ClaimRecord], ledger: &Ledger, config: &SamplingConfig) -> Vec<PlanRow> {
    let mut sections: BTreeMap<(&str, &str), Vec<&ClaimRecord>> = BTreeMap::new();
    for claim in claims {
        sections
            .entry((claim.review_id.as_str(), claim.section.as_str()))
            .or_default()
            .push(claim);
    }

    let mut rows = Vec::new();
    let mut escalated = 0;
    for ((review_id, section), group) in sections {
        let (high, low): (Vec<&ClaimRecord>, Vec<&ClaimRecord>) =
            group.into_iter().partition(|c| c.priority == Priority::High);
        let sample = spread(&low, config.low_sample_size(low.len()));

        let rate = correction_rate(ledger, review_id, section);
        let escalate = rate.map_or(false, |r| r > config.escalation_threshold);
        if escalate {
            escalated += 1;
            debug!(
                "Escalating section {}/{} (correction rate {:.2})",
                review_id,
                section,
                rate.unwrap_or_default()
            );
        }

        for claim in high.into_iter().chain(sample.into_iter().copied()) {
            rows.push(PlanRow {
                review_id: review_id.to_string(),
                section: section.to_string(),
                claim_id: claim.claim_id.clone(),
                priority: claim.priority,
                escalate_to_full_section: escalate,
            });
        }
    }

    info!(
        "Sampling plan selects {} of {} claims ({} sections escalated)",
        rows.len(),
        claims.len(),
        escalated
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use citeaudit_domain::{AdjudicationRecord, Citation, CitationKind, ClaimFlags, ClaimKey, Span};

    fn claim(section: &str, id: usize, high: bool) -> ClaimRecord {
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
        let flags = ClaimFlags {
            has_numbers: high,
            ..ClaimFlags::default()
        };
        ClaimRecord::from_citation(ClaimKey::new("r", section, format!("c{}", id)), "claim", flags, &citation)
    }

    fn with_verdicts(claims: &[ClaimRecord], verdicts: &[&str]) -> Ledger {
        let mut records: Vec<AdjudicationRecord> = claims.iter().map(AdjudicationRecord::scaffold).collect();
        for (record, verdict) in records.iter_mut().zip(verdicts) {
            record.verdict = verdict.to_string();
        }
        Ledger::from_records(records)
    }

    #[test]
    fn test_low_sample_size() {
        let config = SamplingConfig::default();
        assert_eq!(config.low_sample_size(100), 30);
        assert_eq!(config.low_sample_size(34), 10);
        assert_eq!(config.low_sample_size(36), 10);
        assert_eq!(config.low_sample_size(37), 11);
        assert_eq!(config.low_sample_size(3), 3);
    }

    #[test]
    fn test_all_high_and_sampled_low() {
        let mut claims: Vec<ClaimRecord> = (0..40).map(|i| claim("findings", i, false)).collect();
        claims.push(claim("findings", 40, true));
        claims.push(claim("findings", 41, true));

        let plan = sampling_plan(&claims, &Ledger::scaffold(&claims), &SamplingConfig::default());
        assert_eq!(plan.len(), 2 + 12);
        assert_eq!(plan[0].claim_id, "c40");
        assert_eq!(plan[1].claim_id, "c41");
        assert!(plan[2..].iter().all(|r| r.priority == Priority::Low));
        assert_eq!(plan[2].claim_id, "c0");
        assert!(plan.iter().all(|r| !r.escalate_to_full_section));

        let again = sampling_plan(&claims, &Ledger::scaffold(&claims), &SamplingConfig::default());
        assert_eq!(plan, again);
    }

    #[test]
    fn test_sample_spreads_over_section() {
        let items: Vec<usize> = (0..20).collect();
        let picked: Vec<usize> = spread(&items, 5).into_iter().copied().collect();
        assert_eq!(picked, vec![0, 4, 8, 12, 16]);
        assert!(spread(&items, 0).is_empty());
    }

    #[test]
    fn test_escalation_threshold() {
        // 1 of 20 adjudicated = 0.05, not above the threshold
        let claims: Vec<ClaimRecord> = (0..20).map(|i| claim("methods", i, false)).collect();
        let mut verdicts = vec!["SUPPORTED"; 19];
        verdicts.push("UNSUPPORTED_FAIL");
        let ledger = with_verdicts(&claims, &verdicts);
        assert_eq!(correction_rate(&ledger, "r", "methods"), Some(0.05));
        let plan = sampling_plan(&claims, &ledger, &SamplingConfig::default());
        assert!(plan.iter().all(|r| !r.escalate_to_full_section));

        // 2 of 20 = 0.10
        verdicts[0] = "AMBIGUOUS_REVIEW";
        let ledger = with_verdicts(&claims, &verdicts);
        let plan = sampling_plan(&claims, &ledger, &SamplingConfig::default());
        assert!(plan.iter().all(|r| r.escalate_to_full_section));
    }

    #[test]
    fn test_unadjudicated_sections_are_not_escalated() {
        let claims = vec![claim("a", 0, true), claim("b", 1, true)];
        let ledger = with_verdicts(&claims, &["UNSUPPORTED_FAIL"]);

        assert_eq!(correction_rate(&ledger, "r", "a"), Some(1.0));
        assert_eq!(correction_rate(&ledger, "r", "b"), None);
        let plan = sampling_plan(&claims, &ledger, &SamplingConfig::default());
        assert!(plan[0].escalate_to_full_section);
        assert!(!plan[1].escalate_to_full_section);
    }

    #[test]
    fn test_config_validation() {
        assert!(SamplingConfig::default().validate().is_ok());
        let config = SamplingConfig {
            low_sample_fraction: 1.5,
            ..SamplingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
