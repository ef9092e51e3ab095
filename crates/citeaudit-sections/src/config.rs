//! Configuration for section scoring

use serde::{Deserialize, Serialize};

/// Multipliers applied per heading level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBoosts {
    /// Level 1 (research question) headings
    pub level1: f64,
    /// Level 2 headings
    pub level2: f64,
    /// Level 3 headings
    pub level3: f64,
    /// Level 4 headings
    pub level4: f64,
}

impl Default for LevelBoosts {
    fn default() -> Self {
        Self {
            level1: 0.90,
            level2: 1.00,
            level3: 1.10,
            level4: 1.15,
        }
    }
}

impl LevelBoosts {
    /// Boost for a heading level; levels outside 1-4 are neutral
    pub fn for_level(&self, level: u8) -> f64 {
        match level {
            1 => self.level1,
            2 => self.level2,
            3 => self.level3,
            4 => self.level4,
            _ => 1.0,
        }
    }
}

/// Configuration for the SectionAssigner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Factor applied to sections whose title names a summary-like heading
    #[serde(default = "default_heading_penalty")]
    pub heading_penalty: f64,

    /// Heading phrases that receive the penalty (matched on whole words)
    #[serde(default = "default_penalized_headings")]
    pub penalized_headings: Vec<String>,

    /// Per-level multipliers
    #[serde(default)]
    pub level_boosts: LevelBoosts,
}

fn default_heading_penalty() -> f64 {
    0.60
}

fn default_penalized_headings() -> Vec<String> {
    vec![
        "executive summary".to_string(),
        "abstract".to_string(),
        "overview".to_string(),
    ]
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            heading_penalty: default_heading_penalty(),
            penalized_headings: default_penalized_headings(),
            level_boosts: LevelBoosts::default(),
        }
    }
}

impl ScoringConfig {
    /// Flat preset: no heading penalty and no level preference
    pub fn flat() -> Self {
        Self {
            heading_penalty: 1.0,
            penalized_headings: Vec::new(),
            level_boosts: LevelBoosts {
                level1: 1.0,
                level2: 1.0,
                level3: 1.0,
                level4: 1.0,
            },
        }
    }

    /// Penalty factor for a section title
    pub fn penalty_for(&self, title: &str) -> f64 {
        let words: Vec<String> = title
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        let padded = format!(" {} ", words.join(" "));

        let penalized = self.penalized_headings.iter().any(|phrase| {
            let phrase = phrase.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
            !phrase.is_empty() && padded.contains(&format!(" {} ", phrase))
        });
        if penalized {
            self.heading_penalty
        } else {
            1.0
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.heading_penalty > 0.0 && self.heading_penalty <= 1.0) {
            return Err("heading_penalty must be in (0, 1]".to_string());
        }
        let b = &self.level_boosts;
        if [b.level1, b.level2, b.level3, b.level4].iter().any(|v| *v <= 0.0) {
            return Err("level boosts must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
