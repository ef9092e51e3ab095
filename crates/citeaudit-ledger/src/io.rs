//! CSV and JSON-lines persistence for the ledger

use citeaudit_domain::AdjudicationRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::corrections::CorrectionRow;
use crate::decision::DecisionKind;
use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::merge::MergeSource;
use crate::sampling::PlanRow;

/// Read a ledger from CSV with a header row
///
/// Columns are matched by name; missing decision columns read as blank.
pub fn read_ledger<R: Read>(reader: R) -> Result<Ledger, LedgerError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let records = csv_reader
        .deserialize::<AdjudicationRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Ledger::from_records(records))
}

/// Write a ledger as CSV in the fixed column order
pub fn write_ledger<W: Write>(writer: W, ledger: &Ledger) -> Result<(), LedgerError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(AdjudicationRecord::COLUMNS)?;
    for record in ledger.iter() {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Load a ledger file; a missing file is a fatal precondition
pub fn load_ledger(path: impl AsRef<Path>) -> Result<Ledger, LedgerError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LedgerError::MissingScaffold(path.display().to_string()));
    }
    let ledger = read_ledger(BufReader::new(File::open(path)?))?;
    info!("Loaded {} ledger records from {}", ledger.len(), path.display());
    Ok(ledger)
}

/// Save a ledger file
pub fn save_ledger(path: impl AsRef<Path>, ledger: &Ledger) -> Result<(), LedgerError> {
    let path = path.as_ref();
    write_ledger(BufWriter::new(File::create(path)?), ledger)?;
    info!("Wrote {} ledger records to {}", ledger.len(), path.display());
    Ok(())
}

/// Load a decision source from a JSON-lines file
///
/// A missing file is not an error: it is logged and yields `None`.
pub fn load_source(
    name: &str,
    priority: i32,
    kind: DecisionKind,
    path: impl AsRef<Path>,
) -> Result<Option<MergeSource>, LedgerError> {
    let path = path.as_ref();
    if !path.is_file() {
        warn!("Decision source {} not found at {}, skipping", name, path.display());
        return Ok(None);
    }
    let source = MergeSource::from_jsonl(name, priority, kind, BufReader::new(File::open(path)?))?;
    info!("Read {} rows from decision source {}", source.rows.len(), name);
    Ok(Some(source))
}

/// Write correction rows as CSV
pub fn write_corrections<W: Write>(writer: W, rows: &[CorrectionRow]) -> Result<(), LedgerError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(["review_id", "section", "claim_id", "action_type", "proposed_text", "notes"])?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write sampling plan rows as CSV
pub fn write_sampling_plan<W: Write>(writer: W, rows: &[PlanRow]) -> Result<(), LedgerError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(["review_id", "section", "claim_id", "priority", "escalate_to_full_section"])?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
