//! Document outlines built from paragraph lists or markdown

use citeaudit_domain::SectionBody;
use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*#*\s*$").unwrap());

/// Deepest heading level that opens a section
pub const MAX_SECTION_LEVEL: u8 = 4;

/// One paragraph of an extracted document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Heading level when the paragraph is a heading
    pub heading_level: Option<u8>,
    /// Paragraph text
    pub text: String,
}

impl Paragraph {
    /// A body paragraph
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            heading_level: None,
            text: text.into(),
        }
    }

    /// A heading paragraph
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self {
            heading_level: Some(level),
            text: text.into(),
        }
    }
}

/// Ordered sections of one review
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    sections: Vec<SectionBody>,
}

impl Outline {
    /// Wrap already-built sections
    pub fn new(sections: Vec<SectionBody>) -> Self {
        Self { sections }
    }

    /// Build an outline from paragraphs
    ///
    /// Headings of level 1-4 with a non-blank title open a section. Deeper
    /// headings are treated as body text. Paragraphs before the first
    /// heading are ignored.
    pub fn from_paragraphs<I>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = Paragraph>,
    {
        let mut sections = Vec::new();
        let mut current: Option<(u8, String, Vec<String>)> = None;

        for para in paragraphs {
            let text = collapse_whitespace(&para.text);
            match para.heading_level {
                Some(level) if (1..=MAX_SECTION_LEVEL).contains(&level) && !text.is_empty() => {
                    if let Some(done) = current.take() {
                        sections.push(finish(done));
                    }
                    current = Some((level, text, Vec::new()));
                }
                _ => {
                    if let Some((_, _, body)) = current.as_mut() {
                        if !text.is_empty() {
                            body.push(text);
                        }
                    }
                }
            }
        }
        if let Some(done) = current.take() {
            sections.push(finish(done));
        }

        Self { sections }
    }

    /// Build an outline from markdown, treating `#` lines as headings
    ///
    /// Blank lines separate paragraphs.
    pub fn from_markdown(text: &str) -> Self {
        let mut paragraphs = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if let Some(caps) = MARKDOWN_HEADING.captures(trimmed) {
                flush(&mut pending, &mut paragraphs);
                let level = caps[1].len() as u8;
                paragraphs.push(Paragraph::heading(level, &caps[2]));
            } else if trimmed.is_empty() {
                flush(&mut pending, &mut paragraphs);
            } else {
                pending.push(trimmed);
            }
        }
        flush(&mut pending, &mut paragraphs);

        Self::from_paragraphs(paragraphs)
    }

    /// All sections in document order
    pub fn sections(&self) -> &[SectionBody] {
        &self.sections
    }

    /// Title of the first level-1 section
    pub fn research_question(&self) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.is_research_question())
            .map(|s| s.title.as_str())
    }

    /// Sections a claim may be assigned to
    ///
    /// Levels 2-4, plus level-1 sections that carry body text.
    pub fn candidates(&self) -> Vec<&SectionBody> {
        self.sections
            .iter()
            .filter(|s| match s.level {
                1 => !s.body.is_empty(),
                2..=MAX_SECTION_LEVEL => true,
                _ => false,
            })
            .collect()
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the outline has no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn finish((level, title, body): (u8, String, Vec<String>)) -> SectionBody {
    SectionBody::new(level, title, body.join(" "))
}

fn flush(pending: &mut Vec<&str>, paragraphs: &mut Vec<Paragraph>) {
    if !pending.is_empty() {
        paragraphs.push(Paragraph::body(pending.join(" ")));
        pending.clear();
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
