//! In-memory page text provider

use citeaudit_domain::{PageMap, PageTextProvider};
use std::collections::HashMap;
use std::convert::Infallible;

use crate::pages::split_pages;

/// Page text held in memory, keyed by source path
#[derive(Debug, Clone, Default)]
pub struct InMemoryPages {
    sources: HashMap<String, PageMap>,
}

impl InMemoryPages {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Add page text for a source
    pub fn insert(&mut self, source_pdf_path: impl Into<String>, pages: PageMap) {
        self.sources.insert(source_pdf_path.into(), pages);
    }

    /// Add page-marked text for a source
    pub fn insert_marked(&mut self, source_pdf_path: impl Into<String>, text: &str) {
        self.insert(source_pdf_path, split_pages(text));
    }

    /// Number of sources with text
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no source has text
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl PageTextProvider for InMemoryPages {
    type Error = Infallible;

    fn pages(&self, source_pdf_path: &str) -> Result<Option<PageMap>, Self::Error> {
        Ok(self.sources.get(source_pdf_path).cloned())
    }
}
