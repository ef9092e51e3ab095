//! Citation grammar over a single sentence

use citeaudit_domain::{Citation, CitationKind, Span};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::lexeme::{author_years, first_page, is_name, word_spans, AuthorYear, SECONDARY_MARKER};

/// Parenthetical content that opens with a bare year, as in `Smith (2010, p. 4)`
static NARRATIVE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*(\d{4}[a-z]?)\s*(?:[,;:]\s*(.*))?$").unwrap());

/// A balanced, non-nested parenthetical block
#[derive(Debug, Clone, Copy)]
struct Block {
    /// Offset of `(`
    open: usize,
    /// Offset of `)`
    close: usize,
}

impl Block {
    fn inner<'a>(&self, sentence: &'a str) -> &'a str {
        &sentence[self.open + 1..self.close]
    }

    fn span(&self) -> Span {
        Span::new(self.open, self.close + 1)
    }
}

/// A `Name (YEAR)` match before secondary classification
struct NarrativeMatch {
    start: usize,
    end: usize,
    author: String,
    year: String,
    page: Option<String>,
}

/// Extracts structured citations from sentences
///
/// Stateless; one parser can be shared across every sentence of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CitationParser;

impl CitationParser {
    /// Create a parser
    pub fn new() -> Self {
        Self
    }

    /// Parse every citation in `sentence`
    ///
    /// Parenthetical citations come first in block order, then narrative
    /// ones. Repeated detections of the same (author, year, kind, span) are
    /// dropped.
    pub fn parse(&self, sentence: &str) -> Vec<Citation> {
        let blocks = find_blocks(sentence);

        let mut citations = Vec::new();
        for block in &blocks {
            citations.extend(parse_block(sentence, block));
        }
        citations.extend(parse_narratives(sentence, &blocks));

        let mut seen = HashSet::new();
        citations.retain(|c| {
            seen.insert((c.author.clone(), c.year.clone(), c.kind, c.span))
        });
        citations
    }
}

/// Parse the citations in a sentence with a default parser
pub fn parse_citations(sentence: &str) -> Vec<Citation> {
    CitationParser::new().parse(sentence)
}

/// Innermost `( ... )` blocks with non-empty content
fn find_blocks(sentence: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut open = None;
    for (i, b) in sentence.bytes().enumerate() {
        match b {
            b'(' => open = Some(i),
            b')' => {
                if let Some(o) = open.take() {
                    if i > o + 1 {
                        blocks.push(Block { open: o, close: i });
                    }
                }
            }
            _ => {}
        }
    }
    blocks
}

fn parse_block(sentence: &str, block: &Block) -> Vec<Citation> {
    let inner = block.inner(sentence);
    let citation_text = sentence[block.open..=block.close].to_string();

    if let Some(marker) = SECONDARY_MARKER.find(inner) {
        if let Some(host) = author_years(&inner[marker.end()..]).into_iter().next() {
            let primary = author_years(&inner[..marker.start()]).pop();
            return vec![Citation {
                citation_text,
                kind: CitationKind::SecondaryParenthetical,
                author: host.author,
                year: host.year,
                stated_page: first_page(inner),
                primary_mentioned_author: primary.as_ref().map(|p| p.author.clone()),
                primary_mentioned_year: primary.map(|p| p.year),
                span: block.span(),
            }];
        }
    }

    let mut citations = Vec::new();
    for segment in inner.split(';') {
        let page = first_page(segment);
        for AuthorYear { author, year, .. } in author_years(segment) {
            citations.push(Citation {
                citation_text: citation_text.clone(),
                kind: CitationKind::Parenthetical,
                author,
                year,
                stated_page: page.clone(),
                primary_mentioned_author: None,
                primary_mentioned_year: None,
                span: block.span(),
            });
        }
    }
    citations
}

fn parse_narratives(sentence: &str, blocks: &[Block]) -> Vec<Citation> {
    let matches: Vec<NarrativeMatch> = blocks
        .iter()
        .filter_map(|block| {
            let caps = NARRATIVE_YEAR.captures(block.inner(sentence))?;
            let (start, author) = narrative_author(&sentence[..block.open])?;
            Some(NarrativeMatch {
                start,
                end: block.close + 1,
                author,
                year: caps[1].to_string(),
                page: caps.get(2).and_then(|rest| first_page(rest.as_str())),
            })
        })
        .collect();

    let mut citations = Vec::new();
    for (i, m) in matches.iter().enumerate() {
        // A trailing "as cited in" binds to the nearest preceding narrative citation only
        let window_end = matches
            .get(i + 1)
            .map_or(sentence.len(), |next| next.start.max(m.end));
        let tail = &sentence[m.end..window_end];
        let matched = &sentence[m.start..m.end];

        let page = m
            .page
            .clone()
            .or_else(|| first_page(tail))
            .or_else(|| first_page(&sentence[..m.start]));

        let host = SECONDARY_MARKER.find(tail).and_then(|marker| {
            let after = &tail[marker.end()..];
            author_years(after)
                .into_iter()
                .next()
                .map(|ay| (after[..ay.end].trim().to_string(), ay))
        });

        let citation = match host {
            Some((host_text, host)) => Citation {
                citation_text: format!("{}, as cited in {}", matched, host_text),
                kind: CitationKind::SecondaryNarrative,
                author: host.author,
                year: host.year,
                stated_page: page,
                primary_mentioned_author: Some(m.author.clone()),
                primary_mentioned_year: Some(m.year.clone()),
                span: Span::new(m.start, m.end),
            },
            None => Citation {
                citation_text: matched.to_string(),
                kind: CitationKind::Narrative,
                author: m.author.clone(),
                year: m.year.clone(),
                stated_page: page,
                primary_mentioned_author: None,
                primary_mentioned_year: None,
                span: Span::new(m.start, m.end),
            },
        };
        citations.push(citation);
    }
    citations
}

/// Author phrase ending right before a narrative year block
///
/// Grammar, read right to left: `Name [(& | and) Name] [et al.]`.
fn narrative_author(prefix: &str) -> Option<(usize, String)> {
    let words = word_spans(prefix);
    let word = |i: usize| &prefix[words[i].0..words[i].1];
    let last = words.len().checked_sub(1)?;

    let mut name = last;
    if matches!(word(last), "al." | "al") {
        if last < 2 || word(last - 1) != "et" {
            return None;
        }
        name = last - 2;
    }
    if !is_name(word(name)) {
        return None;
    }

    let mut first = name;
    if name >= 2 && matches!(word(name - 1), "&" | "and") && is_name(word(name - 2)) {
        first = name - 2;
    }

    let start = words[first].0;
    Some((start, prefix[start..words[last].1].to_string()))
}
