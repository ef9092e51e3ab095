//! Page-marked text stored on disk

use citeaudit_domain::{PageMap, PageTextProvider};
use citeaudit_evidence::split_pages;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads `<dir>/<pdf stem>.txt` for a source PDF path
#[derive(Debug, Clone)]
pub struct DirectoryTextStore {
    dir: PathBuf,
}

impl DirectoryTextStore {
    /// Create a store over a text directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Text file holding a source's pages
    pub fn text_path(&self, source_pdf_path: &str) -> Option<PathBuf> {
        let stem = Path::new(source_pdf_path).file_stem()?;
        Some(self.dir.join(format!("{}.txt", stem.to_string_lossy())))
    }
}

impl PageTextProvider for DirectoryTextStore {
    type Error = std::io::Error;

    fn pages(&self, source_pdf_path: &str) -> Result<Option<PageMap>, Self::Error> {
        let Some(path) = self.text_path(source_pdf_path) else {
            return Ok(None);
        };
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(split_pages(&String::from_utf8_lossy(&bytes))))
    }
}
