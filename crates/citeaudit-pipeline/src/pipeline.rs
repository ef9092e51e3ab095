//! Stage orchestration

use anyhow::Context;
use citeaudit_citations::ClaimExtractor;
use citeaudit_domain::{ClaimRecord, EvidenceQuery, PageOffset};
use citeaudit_evidence::{EvidenceRetriever, PageOffsetCalibrator};
use citeaudit_ledger::{
    corrections, load_source, sampling_plan, DecisionRow, Ledger, LedgerMerger, MergeReport, MergeSource,
};
use citeaudit_resolver::{AuthorYearResolver, ResolutionReport, SourceIndex};
use citeaudit_sections::{Outline, SectionAssigner, SectionCache};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::io;
use crate::store::DirectoryTextStore;

/// Name of the merge source carrying values from an earlier ledger
pub const PREVIOUS_LEDGER_SOURCE: &str = "previous_ledger";

/// One review document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// File stem of the review
    pub review_id: String,
    /// Full text
    pub text: String,
}

/// Counts from a complete run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Reviews read
    pub reviews: usize,
    /// Whether an existing claim registry was used instead of extraction
    pub reused_registry: bool,
    /// Claim rows in the registry
    pub claims: usize,
    /// Claim rows with a resolved source
    pub resolved: usize,
    /// Sources with a calibrated offset
    pub offsets: usize,
    /// Evidence queries written
    pub queries: usize,
    /// Ledger records
    pub ledger_rows: usize,
    /// Correction rows
    pub corrections: usize,
    /// Claims selected for human review
    pub sampled: usize,
}

/// Runs the audit stages over the configured directories
///
/// Each stage consumes the complete output of the one before it.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self { config })
    }

    /// The configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Path of a file in the outputs directory
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.config.paths.outputs_dir.join(file_name)
    }

    /// Read review documents (`.md`, `.markdown`, `.txt`) in file-name order
    pub fn load_reviews(&self) -> Result<Vec<Review>> {
        let dir = &self.config.paths.reviews_dir;
        if !dir.is_dir() {
            return Err(PipelineError::MissingInput(dir.display().to_string()));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_review_file(p))
            .collect();
        paths.sort();

        let mut reviews = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(review_id) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let text = fs::read_to_string(&path)?;
            reviews.push(Review { review_id, text });
        }
        info!("Loaded {} reviews from {}", reviews.len(), dir.display());
        Ok(reviews)
    }

    /// Extract claim rows from every review
    pub fn extract_claims(&self, reviews: &[Review]) -> Vec<ClaimRecord> {
        let extractor = ClaimExtractor::new();
        let claims: Vec<ClaimRecord> = reviews
            .iter()
            .flat_map(|r| extractor.extract(&r.review_id, &r.text))
            .collect();
        info!("Extracted {} claim rows", claims.len());
        claims
    }

    /// Section outlines for every review
    pub fn section_cache(&self, reviews: &[Review]) -> SectionCache {
        let mut cache = SectionCache::new();
        for review in reviews {
            cache.insert(&review.review_id, Outline::from_markdown(&review.text));
        }
        cache
    }

    /// Assign sections and resolve source files
    pub fn enrich(&self, claims: &mut [ClaimRecord], sections: &SectionCache) -> Result<ResolutionReport> {
        SectionAssigner::new(self.config.scoring.clone()).annotate(sections, claims);

        let index = SourceIndex::build(&self.config.paths.pdf_dir)?;
        let report = AuthorYearResolver::new(index).resolve_claims(claims);
        info!("{}", report.metrics.summary());
        Ok(report)
    }

    /// Page offsets from quoted claims with stated pages
    pub fn calibrate_offsets(&self, claims: &[ClaimRecord]) -> Result<Vec<PageOffset>> {
        let store = DirectoryTextStore::new(&self.config.paths.sources_text_dir);
        Ok(PageOffsetCalibrator::new().calibrate(claims, &store)?)
    }

    /// Evidence queries for every claim
    pub fn retrieve_evidence(&self, claims: &[ClaimRecord], offsets: &[PageOffset]) -> Result<Vec<EvidenceQuery>> {
        let retriever = EvidenceRetriever::new(self.config.retrieval.clone())?;
        let store = DirectoryTextStore::new(&self.config.paths.sources_text_dir);
        Ok(retriever.retrieve_all(claims, &store, offsets)?)
    }

    /// Scaffold the ledger and merge decision sources into it
    ///
    /// Values from an existing ledger file merge first, so earlier decisions
    /// are kept. Missing decision files are skipped.
    pub fn build_ledger(&self, claims: &[ClaimRecord]) -> Result<(Ledger, MergeReport)> {
        let mut ledger = Ledger::scaffold(claims);
        let mut merger = LedgerMerger::new();

        let previous_path = self.output_path(io::LEDGER_FILE);
        if previous_path.is_file() {
            let previous = citeaudit_ledger::load_ledger(&previous_path)?;
            let rows = previous.iter().map(DecisionRow::from_record).collect();
            merger.add_source(MergeSource::new(
                PREVIOUS_LEDGER_SOURCE,
                i32::MIN,
                citeaudit_ledger::DecisionKind::Adjudication,
                rows,
            ));
        }

        for source in &self.config.decision_sources {
            if let Some(loaded) = load_source(&source.name, source.priority, source.kind, &source.path)? {
                merger.add_source(loaded);
            }
        }

        let report = merger.merge(&mut ledger);
        Ok((ledger, report))
    }

    /// Run every stage and write all outputs
    ///
    /// An existing claim registry in the outputs directory is authoritative
    /// and is reused instead of re-extracting, keeping claim ids stable.
    pub fn run_all(&self) -> anyhow::Result<RunSummary> {
        let out = &self.config.paths.outputs_dir;
        fs::create_dir_all(out).with_context(|| format!("creating outputs directory {}", out.display()))?;

        let reviews = self.load_reviews().context("loading reviews")?;
        let registry = self.output_path(io::CLAIMS_FILE);
        let reused_registry = registry.is_file();
        let mut claims = if reused_registry {
            info!("Reusing claim registry {}", registry.display());
            io::read_claims(&registry).context("reading claim registry")?
        } else {
            self.extract_claims(&reviews)
        };
        let sections = self.section_cache(&reviews);

        let resolution = self.enrich(&mut claims, &sections).context("resolving sources")?;
        io::write_claims(&registry, &claims).context("writing claim registry")?;
        io::write_warnings(&self.output_path(io::WARNINGS_FILE), &resolution.warnings)
            .context("writing resolver warnings")?;

        let offsets = self.calibrate_offsets(&claims).context("calibrating page offsets")?;
        io::write_offsets(&self.output_path(io::OFFSETS_FILE), &offsets).context("writing page offsets")?;

        let queries = self.retrieve_evidence(&claims, &offsets).context("retrieving evidence")?;
        io::write_queries(&self.output_path(io::QUERIES_FILE), &queries).context("writing evidence queries")?;

        let (ledger, report) = self.build_ledger(&claims).context("building ledger")?;
        info!("{}", report.summary());
        citeaudit_ledger::save_ledger(self.output_path(io::LEDGER_FILE), &ledger).context("writing ledger")?;

        let fixes = corrections(&ledger);
        write_corrections_file(&self.output_path(io::CORRECTIONS_FILE), &fixes).context("writing corrections")?;

        let plan = sampling_plan(&claims, &ledger, &self.config.sampling);
        write_plan_file(&self.output_path(io::SAMPLING_FILE), &plan).context("writing sampling plan")?;

        let summary = RunSummary {
            reviews: reviews.len(),
            reused_registry,
            claims: claims.len(),
            resolved: claims.iter().filter(|c| c.is_resolved()).count(),
            offsets: offsets.len(),
            queries: queries.len(),
            ledger_rows: ledger.len(),
            corrections: fixes.len(),
            sampled: plan.len(),
        };
        if summary.claims == 0 {
            warn!("No cited claims found in {} reviews", summary.reviews);
        }
        info!("Run complete: {:?}", summary);
        Ok(summary)
    }
}

fn is_review_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| matches!(e.to_ascii_lowercase().as_str(), "md" | "markdown" | "txt"))
}

fn write_corrections_file(path: &Path, rows: &[citeaudit_ledger::CorrectionRow]) -> Result<()> {
    let file = std::io::BufWriter::new(fs::File::create(path)?);
    citeaudit_ledger::write_corrections(file, rows)?;
    Ok(())
}

fn write_plan_file(path: &Path, rows: &[citeaudit_ledger::PlanRow]) -> Result<()> {
    let file = std::io::BufWriter::new(fs::File::create(path)?);
    citeaudit_ledger::write_sampling_plan(file, rows)?;
    Ok(())
}
