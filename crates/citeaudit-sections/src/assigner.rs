//! Claim-to-section assignment

use citeaudit_domain::{ClaimRecord, SectionBody};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::ScoringConfig;
use crate::outline::Outline;
use crate::tfidf::SectionModel;
use crate::tokenize::tokenize;

/// How a section was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMethod {
    /// Weighted tf-idf cosine against section bodies
    Similarity,
    /// Token overlap with section titles
    TitleOverlap,
    /// No section shared vocabulary with the claim
    Unknown,
}

impl AssignmentMethod {
    /// Get the method name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentMethod::Similarity => "similarity",
            AssignmentMethod::TitleOverlap => "title_overlap",
            AssignmentMethod::Unknown => "unknown",
        }
    }
}

/// Section assigned to one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAssignment {
    /// Section title, empty when unknown
    pub title: String,
    /// Section level, absent when unknown
    pub level: Option<u8>,
    /// Weighted score of the chosen section
    pub score: f64,
    /// How the section was chosen
    pub method: AssignmentMethod,
}

impl SectionAssignment {
    fn unknown() -> Self {
        Self {
            title: String::new(),
            level: None,
            score: 0.0,
            method: AssignmentMethod::Unknown,
        }
    }

    /// Whether a section was found
    pub fn is_known(&self) -> bool {
        self.method != AssignmentMethod::Unknown
    }
}

/// An outline with its fitted model
#[derive(Debug, Clone)]
pub struct PreparedOutline {
    outline: Outline,
    candidates: Vec<SectionBody>,
    model: SectionModel,
}

impl PreparedOutline {
    /// Fit the model to an outline's candidate sections
    pub fn new(outline: Outline) -> Self {
        let candidates: Vec<SectionBody> = outline.candidates().into_iter().cloned().collect();
        let bodies: Vec<&str> = candidates.iter().map(|s| s.body.as_str()).collect();
        let model = SectionModel::fit(&bodies);
        Self {
            outline,
            candidates,
            model,
        }
    }

    /// The underlying outline
    pub fn outline(&self) -> &Outline {
        &self.outline
    }
}

/// Prepared outlines keyed by review_id
///
/// Built once per run and passed to the assigner explicitly.
#[derive(Debug, Clone, Default)]
pub struct SectionCache {
    outlines: HashMap<String, PreparedOutline>,
}

impl SectionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare and store a review's outline, replacing any previous one
    pub fn insert(&mut self, review_id: impl Into<String>, outline: Outline) {
        self.outlines.insert(review_id.into(), PreparedOutline::new(outline));
    }

    /// Prepared outline for a review
    pub fn get(&self, review_id: &str) -> Option<&PreparedOutline> {
        self.outlines.get(review_id)
    }

    /// Number of cached reviews
    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }
}

/// Assigns claims to the most similar section of their review
#[derive(Debug, Clone, Default)]
pub struct SectionAssigner {
    config: ScoringConfig,
}

impl SectionAssigner {
    /// Create an assigner with the given scoring configuration
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// The scoring configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn weight(&self, section: &SectionBody) -> f64 {
        self.config.penalty_for(&section.title) * self.config.level_boosts.for_level(section.level)
    }

    /// Assign one claim against a prepared outline
    pub fn assign(&self, prepared: &PreparedOutline, claim_text: &str) -> SectionAssignment {
        let claim_vector = prepared.model.vectorize(claim_text);

        let mut best: Option<(usize, f64)> = None;
        let mut best_score = -1.0;
        for (i, section) in prepared.candidates.iter().enumerate() {
            let score = prepared.model.similarity(&claim_vector, i) * self.weight(section);
            if score > best_score {
                best_score = score;
                best = Some((i, score));
            }
        }

        match best {
            Some((i, score)) if score > 0.0 => {
                let section = &prepared.candidates[i];
                return SectionAssignment {
                    title: section.title.clone(),
                    level: Some(section.level),
                    score,
                    method: AssignmentMethod::Similarity,
                };
            }
            _ => {}
        }

        self.assign_by_title(&prepared.candidates, claim_text)
    }

    /// Fallback: shared-token count between the claim and each title
    fn assign_by_title(&self, candidates: &[SectionBody], claim_text: &str) -> SectionAssignment {
        let claim_tokens: HashSet<String> = tokenize(claim_text).into_iter().collect();

        let mut best: Option<(&SectionBody, f64)> = None;
        for section in candidates {
            let title_tokens: HashSet<String> = tokenize(&section.title).into_iter().collect();
            let overlap = title_tokens.intersection(&claim_tokens).count() as f64;
            let score = overlap * self.weight(section);
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((section, score));
            }
        }

        match best {
            Some((section, score)) if score > 0.0 => SectionAssignment {
                title: section.title.clone(),
                level: Some(section.level),
                score,
                method: AssignmentMethod::TitleOverlap,
            },
            _ => SectionAssignment::unknown(),
        }
    }

    /// Assign every claim text against sections built on the fly
    pub fn assign_sections<S: AsRef<str>>(&self, outline: Outline, claims: &[S]) -> Vec<SectionAssignment> {
        let prepared = PreparedOutline::new(outline);
        claims.iter().map(|c| self.assign(&prepared, c.as_ref())).collect()
    }

    /// Assign a claim of a cached review
    ///
    /// Returns `None` when the review is not in the cache.
    pub fn assign_in_cache(
        &self,
        cache: &SectionCache,
        review_id: &str,
        claim_text: &str,
    ) -> Option<SectionAssignment> {
        cache.get(review_id).map(|prepared| self.assign(prepared, claim_text))
    }

    /// Fill section_title, section_level and research_question on claim rows
    ///
    /// Returns the number of rows that received a section. Rows whose review
    /// is missing from the cache are left untouched.
    pub fn annotate(&self, cache: &SectionCache, claims: &mut [ClaimRecord]) -> usize {
        let mut assigned = 0;
        let mut missing: HashSet<String> = HashSet::new();

        for claim in claims.iter_mut() {
            let Some(prepared) = cache.get(&claim.review_id) else {
                if missing.insert(claim.review_id.clone()) {
                    warn!("No outline cached for review {}", claim.review_id);
                }
                continue;
            };

            let assignment = self.assign(prepared, &claim.claim_text);
            debug!(
                "Claim {} assigned to '{}' via {} ({:.3})",
                claim.claim_id,
                assignment.title,
                assignment.method.as_str(),
                assignment.score
            );

            claim.research_question = prepared.outline.research_question().unwrap_or_default().to_string();
            if assignment.is_known() {
                claim.section_title = assignment.title;
                claim.section_level = assignment.level;
                assigned += 1;
            } else {
                claim.section_title.clear();
                claim.section_level = None;
            }
        }

        info!("Assigned sections to {}/{} claims", assigned, claims.len());
        assigned
    }
}
