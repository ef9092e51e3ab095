//! Section module - headed spans of a review document

use serde::{Deserialize, Serialize};

/// A heading plus the text between it and the next heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBody {
    /// Heading level, 1 through 4
    pub level: u8,
    /// Heading text
    pub title: String,
    /// Whitespace-normalized body text
    pub body: String,
}

impl SectionBody {
    /// Create a section
    pub fn new(level: u8, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Level-1 headings carry the review's research question
    pub fn is_research_question(&self) -> bool {
        self.level == 1
    }
}
