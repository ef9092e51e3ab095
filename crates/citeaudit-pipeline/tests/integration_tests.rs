//! Integration tests for citeaudit-pipeline
//!
//! These tests run every stage over a small on-disk project: one review,
//! a source inventory, page-marked source text and a decision file.

use citeaudit_domain::{Decision, DecisionSource, EvidenceQuery, Verdict};
use citeaudit_ledger::{load_ledger, DecisionKind};
use citeaudit_pipeline::io::{self, read_claims, read_queries, write_decisions};
use citeaudit_pipeline::{collect_decisions, DecisionSourceConfig, PathsConfig, Pipeline, PipelineConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const REVIEW: &str = "\
# How do ministries use evaluation evidence?

## Findings
Treasury officials rarely consult evaluation reports (Patton, 2008).
Patton described evaluation as “a political act” (Patton, 2008, p. 13).
Capacity remains thin across ministries (Nobody, 1950).

## References
Patton, M. Q. (2008). Utilization-focused evaluation. Sage.
";

const PATTON_TEXT: &str = "\
<<<PAGE=1>>>
Utilization-Focused Evaluation
<<<PAGE=2>>>
Preface and acknowledgements
<<<PAGE=3>>>
Evaluation is a political act. Treasury officials rarely consult evaluation reports.
<<<PAGE=4>>>
Index";

/// Supports claims with evidence and fails when there is none
struct Reviewer;

impl DecisionSource for Reviewer {
    type Error = String;

    fn decide(&self, query: &EvidenceQuery) -> Result<Decision, Self::Error> {
        let best = query.evidence.first().ok_or_else(|| "no evidence".to_string())?;
        Ok(Decision {
            verdict: "SUPPORTED".to_string(),
            rationale: format!("Found on page {}", best.page_range),
            page_anchor: best.page_range.clone(),
            required_fix: if query.stated_page.is_empty() {
                "Add a page locator.".to_string()
            } else {
                String::new()
            },
            ..Default::default()
        })
    }
}

fn project(root: &Path) -> PipelineConfig {
    let paths = PathsConfig::under(root);
    fs::create_dir_all(&paths.reviews_dir).unwrap();
    fs::create_dir_all(&paths.pdf_dir).unwrap();
    fs::create_dir_all(&paths.sources_text_dir).unwrap();

    fs::write(paths.reviews_dir.join("rev1.md"), REVIEW).unwrap();
    fs::write(paths.reviews_dir.join("notes.json"), "{}").unwrap();
    fs::write(paths.pdf_dir.join("Patton_2008.pdf"), b"%PDF").unwrap();
    fs::write(paths.sources_text_dir.join("Patton_2008.txt"), PATTON_TEXT).unwrap();

    PipelineConfig {
        decision_sources: vec![DecisionSourceConfig {
            name: "adjudications".to_string(),
            path: paths.outputs_dir.join("adjudications.jsonl"),
            kind: DecisionKind::Adjudication,
            priority: 1,
        }],
        paths,
        ..Default::default()
    }
}

#[test]
fn test_full_run_then_merge_decisions() {
    let dir = TempDir::new().unwrap();
    let config = project(dir.path());
    let outputs = config.paths.outputs_dir.clone();
    let pipeline = Pipeline::new(config).unwrap();

    // first pass: no decisions yet
    let summary = pipeline.run_all().unwrap();
    assert_eq!(summary.reviews, 1);
    assert!(!summary.reused_registry);
    assert_eq!(summary.claims, 3);
    assert_eq!(summary.resolved, 2);
    assert_eq!(summary.offsets, 1);
    assert_eq!(summary.queries, 3);
    assert_eq!(summary.ledger_rows, 3);
    assert_eq!(summary.corrections, 0);
    // every claim carries digits, so all are High priority and nothing is adjudicated yet
    assert_eq!(summary.sampled, 3);
    let plan = fs::read_to_string(outputs.join(io::SAMPLING_FILE)).unwrap();
    assert_eq!(plan.lines().count(), 4);
    assert!(!plan.contains(",true"));

    let claims = read_claims(&outputs.join(io::CLAIMS_FILE)).unwrap();
    assert!(claims.iter().all(|c| c.section == "findings"));
    assert!(claims.iter().all(|c| c.research_question == "How do ministries use evaluation evidence?"));
    assert_eq!(claims[0].in_reference_list, Some(true));
    assert_eq!(claims[2].in_reference_list, Some(false));
    assert!(claims[0].source_pdf_path.ends_with("Patton_2008.pdf"));
    assert_eq!(claims[2].source_pdf_path, "");

    let offsets = fs::read_to_string(outputs.join(io::OFFSETS_FILE)).unwrap();
    assert!(offsets.contains("Patton_2008.pdf,10,1"));
    let warnings = fs::read_to_string(outputs.join(io::WARNINGS_FILE)).unwrap();
    assert!(warnings.contains("Nobody"));

    let queries = read_queries(&outputs.join(io::QUERIES_FILE)).unwrap();
    assert_eq!(queries[1].evidence[0].page_range, "3");
    assert_eq!(queries[1].evidence[0].score, 100);
    assert!(queries[2].evidence.is_empty());

    // an external reviewer decides every query
    let decisions = collect_decisions(&Reviewer, &queries);
    write_decisions(&outputs.join("adjudications.jsonl"), &decisions).unwrap();

    let summary = pipeline.run_all().unwrap();
    assert!(summary.reused_registry);
    assert_eq!(summary.ledger_rows, 3);
    assert_eq!(summary.corrections, 1);

    // one of three findings failed, well above the escalation threshold
    let plan = fs::read_to_string(outputs.join(io::SAMPLING_FILE)).unwrap();
    assert!(plan.lines().skip(1).all(|line| line.ends_with(",High,true")));

    let ledger = load_ledger(outputs.join(io::LEDGER_FILE)).unwrap();
    let failed = ledger.get(&claims[2].key()).unwrap();
    assert_eq!(failed.verdict(), Some(Verdict::UnsupportedFail));
    assert_eq!(failed.risk_flags, "llm_error");
    let quoted = ledger.get(&claims[1].key()).unwrap();
    assert_eq!(quoted.page_anchor, "3");

    // replaying changes nothing
    pipeline.run_all().unwrap();
    assert_eq!(load_ledger(outputs.join(io::LEDGER_FILE)).unwrap(), ledger);
}

#[test]
fn test_missing_reviews_dir_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig {
        paths: PathsConfig::under(dir.path()),
        ..Default::default()
    };
    let pipeline = Pipeline::new(config).unwrap();
    let err = pipeline.run_all().unwrap_err();
    assert!(format!("{:#}", err).contains("loading reviews"));
}
