//! Source inventory index keyed by (surname key, year)

use citeaudit_domain::SourceFile;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ResolverError;
use crate::normalize::normalize;

/// `<Surname>_<YYYY>[suffix].pdf`; the year may not run into further digits
///
/// Surnames may carry accents (precomposed or decomposed) and apostrophes;
/// `normalize` folds them to the same key as the citation side.
static SOURCE_FILE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\p{L}[\p{L}\p{M} _'’-]*)_(\d{4})(?:[^0-9].*)?\.pdf$").unwrap());

/// Parse a file name against the inventory naming pattern
pub fn parse_source_file(path: &Path) -> Option<SourceFile> {
    let file_name = path.file_name()?.to_str()?;
    let caps = SOURCE_FILE_NAME.captures(file_name)?;
    Some(SourceFile {
        path: path.to_path_buf(),
        file_name: file_name.to_string(),
        surname: caps[1].to_string(),
        year: caps[2].parse().ok()?,
    })
}

/// Index of the source inventory
///
/// Several files may share a key; candidates under a key keep path order.
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    entries: BTreeMap<(String, u16), Vec<SourceFile>>,
    skipped: Vec<String>,
}

impl SourceIndex {
    /// Scan a directory (non-recursively) for source files
    pub fn build(dir: impl AsRef<Path>) -> Result<Self, ResolverError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ResolverError::DirectoryNotFound(dir.display().to_string()));
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }

        let index = Self::from_paths(paths);
        info!(
            "Indexed {} source files under {} keys from {} ({} names skipped)",
            index.file_count(),
            index.key_count(),
            dir.display(),
            index.skipped.len()
        );
        Ok(index)
    }

    /// Index an explicit list of paths
    ///
    /// Names that do not follow the inventory pattern are skipped.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        paths.sort();

        let mut index = Self::default();
        for path in paths {
            match parse_source_file(&path) {
                Some(file) => {
                    let key = normalize(&file.surname);
                    index.entries.entry((key, file.year)).or_default().push(file);
                }
                None => {
                    if path.extension().map_or(false, |e| e.eq_ignore_ascii_case("pdf")) {
                        debug!("Skipping source with unrecognised name: {}", path.display());
                    }
                    index.skipped.push(path.display().to_string());
                }
            }
        }
        index
    }

    /// Files indexed under (key, year)
    pub fn candidates(&self, key: &str, year: u16) -> &[SourceFile] {
        self.entries
            .get(&(key.to_string(), year))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct (key, year) entries
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of indexed files
    pub fn file_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether nothing was indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths that did not match the naming pattern
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Iterate over (key, year) and the files under it
    pub fn iter(&self) -> impl Iterator<Item = (&(String, u16), &Vec<SourceFile>)> {
        self.entries.iter()
    }
}
