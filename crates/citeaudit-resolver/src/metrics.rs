//! Metrics collection for resolution runs

use std::collections::HashMap;

use crate::resolver::{Resolution, ResolveStatus, ResolveStrategy};

/// Counts of resolution outcomes
///
/// Tracks outcomes per status, matches per strategy, and rows skipped
/// because they already carried a source path.
#[derive(Debug, Clone, Default)]
pub struct ResolverMetrics {
    /// Resolutions per outcome
    pub outcomes: HashMap<ResolveStatus, usize>,

    /// Matches per strategy
    pub strategies: HashMap<ResolveStrategy, usize>,

    /// Rows left untouched because they were already resolved
    pub skipped: usize,
}

impl ResolverMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one resolution
    pub fn record(&mut self, resolution: &Resolution) {
        *self.outcomes.entry(resolution.status).or_insert(0) += 1;
        if let Some(strategy) = resolution.strategy {
            *self.strategies.entry(strategy).or_insert(0) += 1;
        }
    }

    /// Record a row that was already resolved
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Resolutions with a given outcome
    pub fn count(&self, status: ResolveStatus) -> usize {
        self.outcomes.get(&status).copied().unwrap_or(0)
    }

    /// Total resolutions attempted
    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        self.outcomes.clear();
        self.strategies.clear();
        self.skipped = 0;
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Resolver Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Attempted: {}", self.total()),
            format!("Skipped (already resolved): {}", self.skipped),
            String::new(),
            "Outcomes:".to_string(),
        ];
        for status in [ResolveStatus::Exact, ResolveStatus::Ambiguous, ResolveStatus::NoMatch] {
            lines.push(format!("  {}: {}", status, self.count(status)));
        }

        if !self.strategies.is_empty() {
            lines.push(String::new());
            lines.push("Matches by strategy:".to_string());
            for strategy in ResolveStrategy::DEFAULT_ORDER {
                if let Some(count) = self.strategies.get(&strategy) {
                    lines.push(format!("  {}: {}", strategy.as_str(), count));
                }
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(status: ResolveStatus, strategy: Option<ResolveStrategy>) -> Resolution {
        Resolution {
            status,
            chosen: None,
            candidates: Vec::new(),
            strategy,
            key: "smith".to_string(),
            year: Some(2010),
        }
    }

    #[test]
    fn test_record_and_count() {
        let mut metrics = ResolverMetrics::new();
        metrics.record(&resolution(ResolveStatus::Exact, Some(ResolveStrategy::ExactKey)));
        metrics.record(&resolution(ResolveStatus::Ambiguous, Some(ResolveStrategy::TextFragmentKey)));
        metrics.record(&resolution(ResolveStatus::NoMatch, None));
        metrics.record_skipped();

        assert_eq!(metrics.total(), 3);
        assert_eq!(metrics.count(ResolveStatus::Exact), 1);
        assert_eq!(metrics.strategies.len(), 2);
        assert_eq!(metrics.skipped, 1);
    }

    #[test]
    fn test_summary_mentions_outcomes() {
        let mut metrics = ResolverMetrics::new();
        metrics.record(&resolution(ResolveStatus::NoMatch, None));
        let summary = metrics.summary();
        assert!(summary.contains("no_match: 1"));
        assert!(summary.contains("exact: 0"));
    }

    #[test]
    fn test_reset() {
        let mut metrics = ResolverMetrics::new();
        metrics.record(&resolution(ResolveStatus::Exact, Some(ResolveStrategy::ExactKey)));
        metrics.reset();
        assert_eq!(metrics.total(), 0);
        assert!(metrics.strategies.is_empty());
    }
}
