//! Word-window chunking of page text

use citeaudit_domain::PageMap;

use crate::config::RetrievalConfig;

/// A fixed-size run of words from one or more pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// First physical page covered
    pub page_start: u32,
    /// Last physical page covered
    pub page_end: u32,
    /// Words joined with single spaces
    pub text: String,
}

impl Window {
    /// Whether the window covers the page
    pub fn covers(&self, page: u32) -> bool {
        self.page_start <= page && page <= self.page_end
    }
}

/// Splits page text into overlapping word windows
#[derive(Debug, Clone)]
pub struct PageChunker {
    chunk_words: usize,
    stride: usize,
    cross_page: bool,
}

impl PageChunker {
    /// Create a new chunker; zero sizes are raised to 1
    pub fn new(chunk_words: usize, stride: usize) -> Self {
        Self {
            chunk_words: chunk_words.max(1),
            stride: stride.max(1),
            cross_page: false,
        }
    }

    /// Create a chunker from retrieval settings
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.chunk_words, config.stride).cross_page(config.cross_page)
    }

    /// Slide windows across page boundaries
    pub fn cross_page(mut self, enabled: bool) -> Self {
        self.cross_page = enabled;
        self
    }

    /// Chunk pages in page order
    ///
    /// Per-page mode never crosses a page boundary, and every page with at
    /// least one word yields at least one window.
    pub fn chunk(&self, pages: &PageMap) -> Vec<Window> {
        if self.cross_page {
            return self.chunk_across_pages(pages);
        }

        let mut windows = Vec::new();
        for (page, text) in pages {
            let words: Vec<&str> = text.split_whitespace().collect();
            for (start, end) in self.spans(words.len()) {
                windows.push(Window {
                    page_start: *page,
                    page_end: *page,
                    text: words[start..end].join(" "),
                });
            }
        }
        windows
    }

    fn chunk_across_pages(&self, pages: &PageMap) -> Vec<Window> {
        let mut words = Vec::new();
        let mut word_pages = Vec::new();
        for (page, text) in pages {
            for word in text.split_whitespace() {
                words.push(word);
                word_pages.push(*page);
            }
        }

        self.spans(words.len())
            .into_iter()
            .map(|(start, end)| Window {
                page_start: word_pages[start],
                page_end: word_pages[end - 1],
                text: words[start..end].join(" "),
            })
            .collect()
    }

    /// Window bounds over `len` words
    ///
    /// Starts advance by the stride while a full window fits. When the last
    /// full window stops short of the end, one more window is aligned to the
    /// final word.
    fn spans(&self, len: usize) -> Vec<(usize, usize)> {
        if len == 0 {
            return Vec::new();
        }
        if len <= self.chunk_words {
            return vec![(0, len)];
        }

        let last_start = len - self.chunk_words;
        let mut spans: Vec<(usize, usize)> = (0..=last_start)
            .step_by(self.stride)
            .map(|start| (start, start + self.chunk_words))
            .collect();
        if spans.last().map_or(false, |(_, end)| *end < len) {
            spans.push((last_start, len));
        }
        spans
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Pages numbered from 1 whose words are unique (`p<page>w<i>`)
    fn numbered_pages(word_counts: &[usize]) -> PageMap {
        word_counts
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let page = i as u32 + 1;
                let text = (0..*n).map(|w| format!("p{}w{}", page, w)).collect::<Vec<_>>().join(" ");
                (page, text)
            })
            .collect()
    }

    proptest! {
        /// Property: every non-blank page is fully covered by windows that stay on it
        #[test]
        fn test_per_page_coverage(
            word_counts in proptest::collection::vec(0usize..40, 1..6),
            chunk_words in 1usize..20,
            stride_seed in 0usize..20,
        ) {
            let stride = 1 + stride_seed % chunk_words;
            let pages = numbered_pages(&word_counts);
            let windows = PageChunker::new(chunk_words, stride).chunk(&pages);

            prop_assert!(windows.iter().all(|w| w.page_start == w.page_end));
            prop_assert!(windows.iter().all(|w| w.text.split(' ').count() <= chunk_words));

            for (page, text) in &pages {
                let on_page: Vec<&Window> = windows.iter().filter(|w| w.page_start == *page).collect();
                if text.is_empty() {
                    prop_assert!(on_page.is_empty());
                    continue;
                }
                prop_assert!(!on_page.is_empty());
                for word in text.split(' ') {
                    prop_assert!(on_page.iter().any(|w| w.text.split(' ').any(|x| x == word)));
                }
            }
        }

        /// Property: cross-page windows cover every word and report ordered page ranges
        #[test]
        fn test_cross_page_coverage(
            word_counts in proptest::collection::vec(0usize..40, 1..6),
            chunk_words in 1usize..20,
            stride_seed in 0usize..20,
        ) {
            let stride = 1 + stride_seed % chunk_words;
            let pages = numbered_pages(&word_counts);
            let windows = PageChunker::new(chunk_words, stride).cross_page(true).chunk(&pages);

            prop_assert!(windows.iter().all(|w| w.page_start <= w.page_end));
            for (page, text) in &pages {
                for word in text.split_whitespace() {
                    prop_assert!(windows
                        .iter()
                        .any(|w| w.covers(*page) && w.text.split(' ').any(|x| x == word)));
                }
            }
        }
    }
}
