//! `<<<PAGE=n>>>` page-marker codec

use citeaudit_domain::PageMap;
use once_cell::sync::Lazy;
use regex::Regex;

static PAGE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<<<PAGE=(\d+)>>>\r?$").unwrap());

/// Marker line preceding page `n`
pub fn page_marker(n: u32) -> String {
    format!("<<<PAGE={}>>>", n)
}

/// Join pages into page-marked text
///
/// Each page is its marker line followed by the page text; pages are
/// separated by a single newline.
pub fn join_pages(pages: &PageMap) -> String {
    pages
        .iter()
        .map(|(n, text)| format!("{}\n{}", page_marker(*n), text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split page-marked text into pages
///
/// Text before the first marker is discarded. A repeated page number keeps
/// the last occurrence.
pub fn split_pages(text: &str) -> PageMap {
    let mut pages = PageMap::new();
    let mut current: Option<(u32, Vec<&str>)> = None;

    for line in text.split('\n') {
        let page = PAGE_MARKER
            .captures(line)
            .and_then(|caps| caps[1].parse::<u32>().ok());
        match page {
            Some(n) => {
                if let Some((prev, lines)) = current.take() {
                    pages.insert(prev, lines.join("\n"));
                }
                current = Some((n, Vec::new()));
            }
            None => {
                if let Some((_, lines)) = current.as_mut() {
                    lines.push(line);
                }
            }
        }
    }
    if let Some((prev, lines)) = current {
        pages.insert(prev, lines.join("\n"));
    }
    pages
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: splitting inverts joining for marker-free page text
        #[test]
        fn test_split_inverts_join(pages in prop::collection::btree_map(1u32..500, "[a-z .\n]{0,40}", 0..8)) {
            prop_assert_eq!(split_pages(&join_pages(&pages)), pages);
        }
    }
}
