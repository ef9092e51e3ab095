//! Integration tests for citeaudit-sections
//!
//! These tests build outlines from markdown and annotate claim rows.

use citeaudit_domain::{Citation, CitationKind, ClaimFlags, ClaimKey, ClaimRecord, Span};
use citeaudit_sections::{Outline, ScoringConfig, SectionAssigner, SectionCache};

const REVIEW: &str = "\
# How do budget processes use evaluation evidence?

## Executive Summary
Ministries rarely use evaluation evidence when setting budgets.

## Methods
We searched three databases and screened titles and abstracts in pairs.

## Findings

### Budget processes
Treasury officials rarely consult evaluation evidence during budget preparation.

### Capacity
Evaluation units lack trained staff and stable funding.
";

fn claim(review_id: &str, id: &str, text: &str) -> ClaimRecord {
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
    ClaimRecord::from_citation(ClaimKey::new(review_id, "unknown", id), text, ClaimFlags::default(), &citation)
}

#[test]
fn test_annotate_claims_from_markdown_outline() {
    let mut cache = SectionCache::new();
    cache.insert("rev", Outline::from_markdown(REVIEW));

    let mut claims = vec![
        claim("rev", "c1", "Treasury officials rarely consult evaluation evidence."),
        claim("rev", "c2", "Units lack trained staff."),
        claim("rev", "c3", "Zebras gallop."),
        claim("other", "c4", "Treasury officials rarely consult evaluation evidence."),
    ];

    let assigner = SectionAssigner::new(ScoringConfig::default());
    let assigned = assigner.annotate(&cache, &mut claims);

    assert_eq!(assigned, 2);
    assert_eq!(claims[0].section_title, "Budget processes");
    assert_eq!(claims[0].section_level, Some(3));
    assert_eq!(claims[0].research_question, "How do budget processes use evaluation evidence?");
    assert_eq!(claims[1].section_title, "Capacity");
    assert_eq!(claims[2].section_title, "");
    assert_eq!(claims[2].section_level, None);
    assert_eq!(claims[2].research_question, "How do budget processes use evaluation evidence?");
    assert_eq!(claims[3].research_question, "");
}

#[test]
fn test_config_from_toml_changes_ranking() {
    let body = "Ministries rarely use evaluation evidence when setting budgets.";
    let outline = Outline::from_markdown(&format!("## Overview\n{}\n\n## Discussion\n{}\n", body, body));

    let default = SectionAssigner::default().assign_sections(outline.clone(), &[body]);
    assert_eq!(default[0].title, "Discussion");

    let config = ScoringConfig::from_toml("penalized_headings = [\"discussion\"]").unwrap();
    assert!(config.validate().is_ok());
    let custom = SectionAssigner::new(config).assign_sections(outline, &[body]);
    assert_eq!(custom[0].title, "Overview");
}
