//! Lexemes of the citation grammar: author lists, years, page locators and
//! the secondary marker

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}[a-z]?\b").unwrap());

static PAGE_LOCATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bpp?\.\s*(\d+(?:\s*[-–]\s*\d+)?)").unwrap());

pub(crate) static SECONDARY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bas\s+cited\s+in\b").unwrap());

/// Surname particles that may precede a capitalised surname
pub(crate) const PARTICLES: [&str; 9] = ["van", "von", "de", "den", "der", "del", "la", "le", "da"];

/// An author list followed by the year it is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuthorYear {
    pub author: String,
    pub year: String,
    /// Byte offset just past the year
    pub end: usize,
}

/// Page locators in `text` with their normalized value (`12` or `12-14`)
pub(crate) fn page_locators(text: &str) -> Vec<(Range<usize>, String)> {
    PAGE_LOCATOR
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let value: String = caps[1]
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| if c == '–' { '-' } else { c })
                .collect();
            Some((whole.range(), value))
        })
        .collect()
}

/// First page locator value in `text`
pub(crate) fn first_page(text: &str) -> Option<String> {
    page_locators(text).into_iter().next().map(|(_, v)| v)
}

/// Year tokens in `text`, skipping digits that belong to a page locator
pub(crate) fn years(text: &str) -> Vec<Range<usize>> {
    let pages: Vec<Range<usize>> = page_locators(text).into_iter().map(|(r, _)| r).collect();
    YEAR.find_iter(text)
        .map(|m| m.range())
        .filter(|r| !pages.iter().any(|p| p.start < r.end && r.start < p.end))
        .collect()
}

/// Byte ranges of whitespace-separated words
pub(crate) fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().map_or(false, char::is_uppercase)
}

/// Clean the text preceding a year into an author list
///
/// Lowercase lead-ins such as `see`, `e.g.,` or `cf.` are dropped, except for
/// surname particles directly before the capitalised surname. Spans without a
/// capitalised word, or containing digits, are not author lists.
pub(crate) fn author_phrase(span: &str) -> Option<String> {
    let trimmed = span.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'));
    let words = word_spans(trimmed);
    let first_upper = words.iter().position(|&(s, e)| starts_uppercase(&trimmed[s..e]))?;

    let mut first = first_upper;
    while first > 0 {
        let (s, e) = words[first - 1];
        if PARTICLES.contains(&&trimmed[s..e]) {
            first -= 1;
        } else {
            break;
        }
    }

    let author = trimmed[words[first].0..].trim_end_matches(|c: char| c.is_whitespace() || c == ',');
    if author.is_empty() || author.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(author.to_string())
}

/// Every (author list, year) pair in `text`
///
/// A year preceded only by a separator reuses the previous author list, so
/// `Smith, 2010, 2012` yields two pairs.
pub(crate) fn author_years(text: &str) -> Vec<AuthorYear> {
    let mut pairs = Vec::new();
    let mut cursor = 0;
    let mut current: Option<String> = None;

    for year in years(text) {
        let between = &text[cursor..year.start];
        match author_phrase(between) {
            Some(author) => current = Some(author),
            None if between.trim_matches(|c: char| c.is_whitespace() || c == ',').is_empty() => {}
            None => current = None,
        }
        if let Some(author) = &current {
            pairs.push(AuthorYear {
                author: author.clone(),
                year: text[year.clone()].to_string(),
                end: year.end,
            });
        }
        cursor = year.end;
    }
    pairs
}

/// A capitalised name token as it appears in running text: `Smith`, `O'Neil`, `Smith-Jones`
pub(crate) fn is_name(word: &str) -> bool {
    starts_uppercase(word)
        && word.chars().count() >= 2
        && word
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, '\'' | '’' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_locators_normalize_ranges() {
        let found = page_locators("see pp. 12 – 14 and p.3");
        let values: Vec<_> = found.into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec!["12-14", "3"]);
    }

    #[test]
    fn test_years_skip_page_numbers() {
        let text = "Smith, 2010, pp. 1994-2001";
        let found: Vec<_> = years(text).into_iter().map(|r| &text[r]).collect();
        assert_eq!(found, vec!["2010"]);
    }

    #[test]
    fn test_year_with_letter_suffix() {
        let text = "Smith, 2010a";
        let found: Vec<_> = years(text).into_iter().map(|r| &text[r]).collect();
        assert_eq!(found, vec!["2010a"]);
    }

    #[test]
    fn test_author_phrase_drops_lead_in() {
        assert_eq!(author_phrase("see also Smith et al., ").as_deref(), Some("Smith et al."));
        assert_eq!(author_phrase("e.g., Jones & Lee,").as_deref(), Some("Jones & Lee"));
    }

    #[test]
    fn test_author_phrase_keeps_particles() {
        assert_eq!(author_phrase("van der Berg, ").as_deref(), Some("van der Berg"));
        assert_eq!(author_phrase("see de Souza").as_deref(), Some("de Souza"));
    }

    #[test]
    fn test_author_phrase_rejects_non_authors() {
        assert_eq!(author_phrase("n = "), None);
        assert_eq!(author_phrase(", "), None);
        assert_eq!(author_phrase("Table 2, "), None);
    }

    #[test]
    fn test_author_years_multiple_years_same_author() {
        let pairs = author_years("Smith, 2010, 2012");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].author, "Smith");
        assert_eq!(pairs[1].author, "Smith");
        assert_eq!(pairs[1].year, "2012");
    }

    #[test]
    fn test_author_years_comma_separated_authors() {
        let pairs = author_years("Smith, 2010, Jones, 2011");
        assert_eq!(pairs[0].author, "Smith");
        assert_eq!(pairs[1].author, "Jones");
    }

    #[test]
    fn test_is_name() {
        assert!(is_name("Smith"));
        assert!(is_name("O'Neil"));
        assert!(is_name("Müller"));
        assert!(!is_name("smith"));
        assert!(!is_name("J."));
        assert!(!is_name("A"));
    }

    #[test]
    fn test_word_spans() {
        let text = "  ab  cd e";
        let words: Vec<_> = word_spans(text).into_iter().map(|(s, e)| &text[s..e]).collect();
        assert_eq!(words, vec!["ab", "cd", "e"]);
    }
}
