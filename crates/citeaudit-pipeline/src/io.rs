//! Stage input and output files

use citeaudit_domain::{ClaimRecord, EvidenceQuery, PageOffset};
use citeaudit_ledger::KeyedDecision;
use citeaudit_resolver::ResolveWarning;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Claim registry
pub const CLAIMS_FILE: &str = "claims.csv";
/// Resolver warnings
pub const WARNINGS_FILE: &str = "resolve_warnings.csv";
/// Page-offset table
pub const OFFSETS_FILE: &str = "page_offsets.csv";
/// Evidence queries
pub const QUERIES_FILE: &str = "evidence_queries.jsonl";
/// Adjudication ledger
pub const LEDGER_FILE: &str = "adjudication_ledger.csv";
/// Correction list
pub const CORRECTIONS_FILE: &str = "corrections.csv";
/// Human review sampling plan
pub const SAMPLING_FILE: &str = "sampling_plan.csv";

/// Write rows as CSV with a header derived from the row type
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read CSV rows by header name
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(BufReader::new(File::open(path)?));
    let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(rows)
}

/// Write one JSON object per line
pub fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read one JSON object per non-blank line
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(serde_json::from_str(&line)?);
    }
    Ok(rows)
}

/// Write the claim registry
pub fn write_claims(path: &Path, claims: &[ClaimRecord]) -> Result<()> {
    write_csv(path, claims)
}

/// Read the claim registry; a missing registry is fatal
pub fn read_claims(path: &Path) -> Result<Vec<ClaimRecord>> {
    if !path.is_file() {
        return Err(PipelineError::MissingInput(path.display().to_string()));
    }
    read_csv(path)
}

/// Write resolver warnings
pub fn write_warnings(path: &Path, warnings: &[ResolveWarning]) -> Result<()> {
    if warnings.is_empty() {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["review_id", "claim_id", "chosen_author", "chosen_year", "candidates", "reason"])?;
        writer.flush()?;
        return Ok(());
    }
    write_csv(path, warnings)
}

/// Write the page-offset table
pub fn write_offsets(path: &Path, offsets: &[PageOffset]) -> Result<()> {
    if offsets.is_empty() {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["source_pdf_path", "logical_minus_pdf_offset", "n_examples"])?;
        writer.flush()?;
        return Ok(());
    }
    write_csv(path, offsets)
}

/// Read the page-offset table; a missing table means no offsets
pub fn read_offsets(path: &Path) -> Result<Vec<PageOffset>> {
    if !path.is_file() {
        return Ok(Vec::new());
    }
    read_csv(path)
}

/// Write evidence queries
pub fn write_queries(path: &Path, queries: &[EvidenceQuery]) -> Result<()> {
    write_jsonl(path, queries)
}

/// Read evidence queries
pub fn read_queries(path: &Path) -> Result<Vec<EvidenceQuery>> {
    if !path.is_file() {
        return Err(PipelineError::MissingInput(path.display().to_string()));
    }
    read_jsonl(path)
}

/// Write keyed decisions as a decision-source file
pub fn write_decisions(path: &Path, decisions: &[KeyedDecision]) -> Result<()> {
    write_jsonl(path, decisions)
}
