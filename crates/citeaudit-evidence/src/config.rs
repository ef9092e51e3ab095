//! Configuration for evidence retrieval

use serde::{Deserialize, Serialize};

/// Window and ranking settings for the EvidenceRetriever
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Words per window
    #[serde(default = "default_chunk_words")]
    pub chunk_words: usize,

    /// Words between window starts
    #[serde(default = "default_stride", alias = "chunk_stride")]
    pub stride: usize,

    /// Maximum evidence items per claim
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Slide windows across page boundaries
    #[serde(default)]
    pub cross_page: bool,
}

fn default_chunk_words() -> usize {
    180
}

fn default_stride() -> usize {
    90
}

fn default_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_words: default_chunk_words(),
            stride: default_stride(),
            top_k: default_top_k(),
            cross_page: false,
        }
    }
}

impl RetrievalConfig {
    /// Create precise configuration (smaller windows, more candidates)
    pub fn precise() -> Self {
        Self {
            chunk_words: 120,
            stride: 60,
            top_k: 8,
            cross_page: false,
        }
    }

    /// Create broad configuration (larger windows spanning pages)
    pub fn broad() -> Self {
        Self {
            chunk_words: 240,
            stride: 120,
            top_k: 5,
            cross_page: true,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_words == 0 {
            return Err("chunk_words must be greater than 0".to_string());
        }
        if self.stride == 0 {
            return Err("stride must be greater than 0".to_string());
        }
        if self.stride > self.chunk_words {
            return Err("stride must not exceed chunk_words".to_string());
        }
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
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
