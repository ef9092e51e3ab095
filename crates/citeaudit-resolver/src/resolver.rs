//! Author/year resolution against the source index

use citeaudit_domain::{ClaimRecord, SourceFile};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::index::SourceIndex;
use crate::metrics::ResolverMetrics;
use crate::normalize::{normalize, strip_lead_in};
use crate::year::{year_number, ResolutionTarget};

/// Ways of deriving a lookup key, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveStrategy {
    /// Normalized author string
    ExactKey,
    /// Author span of the sub-citation in citation_text that carries the year
    TextFragmentKey,
}

impl ResolveStrategy {
    /// Default strategy order
    pub const DEFAULT_ORDER: [ResolveStrategy; 2] =
        [ResolveStrategy::ExactKey, ResolveStrategy::TextFragmentKey];

    /// Get the strategy name
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveStrategy::ExactKey => "exact_key",
            ResolveStrategy::TextFragmentKey => "text_fragment_key",
        }
    }
}

/// Outcome class of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveStatus {
    /// Exactly one candidate
    Exact,
    /// Several candidates; one chosen by tie-break and flagged for review
    Ambiguous,
    /// No candidate; the source path stays blank
    NoMatch,
}

impl ResolveStatus {
    /// Get the status name
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveStatus::Exact => "exact",
            ResolveStatus::Ambiguous => "ambiguous",
            ResolveStatus::NoMatch => "no_match",
        }
    }
}

impl fmt::Display for ResolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving one (author, year)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Outcome class
    pub status: ResolveStatus,
    /// Chosen file, absent on `NoMatch`
    pub chosen: Option<SourceFile>,
    /// Every file under the matched key, in index order
    pub candidates: Vec<SourceFile>,
    /// Strategy that produced the match
    pub strategy: Option<ResolveStrategy>,
    /// Key that matched (or the primary key when nothing matched)
    pub key: String,
    /// Numeric year that was looked up
    pub year: Option<u16>,
}

impl Resolution {
    fn no_match(key: String, year: Option<u16>) -> Self {
        Self {
            status: ResolveStatus::NoMatch,
            chosen: None,
            candidates: Vec::new(),
            strategy: None,
            key,
            year,
        }
    }

    /// Chosen path as stored in claim rows
    pub fn path(&self) -> Option<String> {
        self.chosen.as_ref().map(SourceFile::path_string)
    }
}

/// Review flag for a claim whose resolution was not exact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveWarning {
    /// Review document identifier
    pub review_id: String,
    /// Claim identifier
    pub claim_id: String,
    /// Author the lookup used
    pub chosen_author: String,
    /// Year the lookup used
    pub chosen_year: String,
    /// Semicolon-joined candidate file names
    pub candidates: String,
    /// `ambiguous` or `no_match`
    pub reason: ResolveStatus,
}

/// Outcome of resolving a batch of claim rows
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    /// Outcome counts
    pub metrics: ResolverMetrics,
    /// One warning per non-exact claim row
    pub warnings: Vec<ResolveWarning>,
}

/// Resolves author/year citations to files in the source inventory
///
/// Owns the source index for the duration of a run. Lookups are exact on
/// (surname key, year); a different year is never considered.
#[derive(Debug, Clone)]
pub struct AuthorYearResolver {
    index: SourceIndex,
    strategies: Vec<ResolveStrategy>,
}

impl AuthorYearResolver {
    /// Create a resolver with the default strategy order
    pub fn new(index: SourceIndex) -> Self {
        Self::with_strategies(index, ResolveStrategy::DEFAULT_ORDER.to_vec())
    }

    /// Create a resolver with an explicit strategy order
    pub fn with_strategies(index: SourceIndex, strategies: Vec<ResolveStrategy>) -> Self {
        Self { index, strategies }
    }

    /// The underlying index
    pub fn index(&self) -> &SourceIndex {
        &self.index
    }

    /// Resolve an author and year string
    ///
    /// `citation_text` enables the text-fragment strategy for authors whose
    /// own key finds nothing.
    pub fn resolve(&self, author: &str, year: &str, citation_text: Option<&str>) -> Resolution {
        let primary_key = normalize(author);
        let Some(year_num) = year_number(year) else {
            return Resolution::no_match(primary_key, None);
        };

        let mut tried: Vec<String> = Vec::new();
        for strategy in &self.strategies {
            let key = match strategy {
                ResolveStrategy::ExactKey => Some(primary_key.clone()),
                ResolveStrategy::TextFragmentKey => {
                    citation_text.and_then(|text| fragment_key(text, year_num))
                }
            };
            let Some(key) = key.filter(|k| !k.is_empty() && !tried.contains(k)) else {
                continue;
            };

            let candidates = self.index.candidates(&key, year_num);
            if !candidates.is_empty() {
                return decide(key, year_num, candidates, *strategy);
            }
            tried.push(key);
        }

        Resolution::no_match(primary_key, Some(year_num))
    }

    /// Resolve a claim row against its targets, primary work first for secondary citations
    pub fn resolve_record(&self, record: &ClaimRecord) -> (ResolutionTarget, Resolution) {
        let targets = ResolutionTarget::for_record(record);
        let mut last = None;
        for target in targets {
            let resolution = self.resolve(
                &target.author,
                target.year.as_deref().unwrap_or(""),
                Some(&record.citation_text),
            );
            if resolution.status != ResolveStatus::NoMatch {
                return (target, resolution);
            }
            last = Some((target, resolution));
        }
        // for_record always yields at least the citation's own target
        last.unwrap_or_else(|| {
            let target = ResolutionTarget {
                author: record.citation_author.clone(),
                year: None,
                is_primary_of_secondary: false,
            };
            (target, Resolution::no_match(String::new(), None))
        })
    }

    /// Fill `source_pdf_path` on every row and report non-exact outcomes
    ///
    /// Rows that already carry a path are counted as skipped and left alone.
    /// Unresolved rows keep a blank path.
    pub fn resolve_claims(&self, records: &mut [ClaimRecord]) -> ResolutionReport {
        let mut report = ResolutionReport::default();

        for record in records.iter_mut() {
            if record.is_resolved() {
                report.metrics.record_skipped();
                continue;
            }

            let (target, resolution) = self.resolve_record(record);
            report.metrics.record(&resolution);

            match resolution.status {
                ResolveStatus::Exact => {}
                ResolveStatus::Ambiguous => warn!(
                    "Ambiguous source for claim {} ({} {}): chose {} from {} candidates",
                    record.claim_id,
                    target.author,
                    target.year.as_deref().unwrap_or("?"),
                    resolution.chosen.as_ref().map_or("", |f| f.file_name.as_str()),
                    resolution.candidates.len()
                ),
                ResolveStatus::NoMatch => debug!(
                    "No source for claim {} ({} {})",
                    record.claim_id,
                    target.author,
                    target.year.as_deref().unwrap_or("?")
                ),
            }

            if resolution.status != ResolveStatus::Exact {
                report.warnings.push(ResolveWarning {
                    review_id: record.review_id.clone(),
                    claim_id: record.claim_id.clone(),
                    chosen_author: target.author.clone(),
                    chosen_year: target.year.clone().unwrap_or_default(),
                    candidates: resolution
                        .candidates
                        .iter()
                        .map(|f| f.file_name.as_str())
                        .collect::<Vec<_>>()
                        .join(";"),
                    reason: resolution.status,
                });
            }

            if let Some(path) = resolution.path() {
                record.source_pdf_path = path;
            }
        }

        info!(
            "Resolved {} claim rows: {} exact, {} ambiguous, {} unresolved",
            records.len(),
            report.metrics.count(ResolveStatus::Exact),
            report.metrics.count(ResolveStatus::Ambiguous),
            report.metrics.count(ResolveStatus::NoMatch)
        );
        report
    }
}

fn decide(key: String, year: u16, candidates: &[SourceFile], strategy: ResolveStrategy) -> Resolution {
    let status = if candidates.len() == 1 {
        ResolveStatus::Exact
    } else {
        ResolveStatus::Ambiguous
    };
    Resolution {
        status,
        chosen: tie_break(candidates).cloned(),
        candidates: candidates.to_vec(),
        strategy: Some(strategy),
        key,
        year: Some(year),
    }
}

/// Deterministic choice among files sharing a key
///
/// Prefers a name with no suffix after the year (`Smith_2010.pdf`), then the
/// shortest name, then case-insensitive lexicographic order.
pub fn tie_break(candidates: &[SourceFile]) -> Option<&SourceFile> {
    candidates.iter().min_by_key(|f| {
        let lower = f.file_name.to_lowercase();
        let literal = format!("{}_{}.pdf", f.surname.to_lowercase(), f.year);
        (lower != literal, f.file_name.chars().count(), lower, f.file_name.clone())
    })
}

/// Alternate key from the sub-citation of `citation_text` that carries `year`
fn fragment_key(citation_text: &str, year: u16) -> Option<String> {
    let year = year.to_string();
    let part = citation_text.split(';').find(|p| p.contains(&year))?;
    let head = &part[..part.find(&year)?];
    let head = head.trim_end_matches(|c: char| c == ',' || c.is_whitespace());
    let key = normalize(strip_lead_in(head));
    (!key.is_empty()).then_some(key)
}
