//! Pipeline configuration

use citeaudit_evidence::RetrievalConfig;
use citeaudit_ledger::{DecisionKind, SamplingConfig};
use citeaudit_sections::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Review documents (`.md`, `.markdown` or `.txt`), one file per review
    #[serde(default = "default_reviews_dir")]
    pub reviews_dir: PathBuf,

    /// Source inventory of `<Surname>_<YYYY>[suffix].pdf` files
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: PathBuf,

    /// Page-marked text, one `<pdf stem>.txt` per source
    #[serde(default = "default_sources_text_dir")]
    pub sources_text_dir: PathBuf,

    /// Directory all stage outputs are written to
    #[serde(default = "default_outputs_dir")]
    pub outputs_dir: PathBuf,
}

fn default_reviews_dir() -> PathBuf {
    PathBuf::from("data/reviews")
}

fn default_pdf_dir() -> PathBuf {
    PathBuf::from("data/pdfs")
}

fn default_sources_text_dir() -> PathBuf {
    PathBuf::from("data/sources_text")
}

fn default_outputs_dir() -> PathBuf {
    PathBuf::from("outputs")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            reviews_dir: default_reviews_dir(),
            pdf_dir: default_pdf_dir(),
            sources_text_dir: default_sources_text_dir(),
            outputs_dir: default_outputs_dir(),
        }
    }
}

impl PathsConfig {
    /// All paths under one root directory
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            reviews_dir: root.join("reviews"),
            pdf_dir: root.join("pdfs"),
            sources_text_dir: root.join("sources_text"),
            outputs_dir: root.join("outputs"),
        }
    }
}

/// One external decision file merged into the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSourceConfig {
    /// Unique source name
    pub name: String,
    /// JSON-lines file
    pub path: PathBuf,
    /// Which fields the source supplies
    pub kind: DecisionKind,
    /// Merge order; lower merges first
    #[serde(default)]
    pub priority: i32,
}

/// Configuration for a full pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Evidence window settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Section scoring settings
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Decision files merged into the ledger
    #[serde(default)]
    pub decision_sources: Vec<DecisionSourceConfig>,

    /// Human review sampling settings
    #[serde(default)]
    pub sampling: SamplingConfig,
}

impl PipelineConfig {
    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PipelineError::MissingInput(path.display().to_string()));
        }
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&contents)?;
        config.validate().map_err(PipelineError::Config)?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.paths.outputs_dir.as_os_str().is_empty() {
            return Err("paths.outputs_dir must not be empty".to_string());
        }
        self.retrieval.validate().map_err(|e| format!("retrieval: {}", e))?;
        self.scoring.validate().map_err(|e| format!("scoring: {}", e))?;
        self.sampling.validate().map_err(|e| format!("sampling: {}", e))?;

        let mut names = HashSet::new();
        let mut priorities = HashSet::new();
        for source in &self.decision_sources {
            if source.name.trim().is_empty() {
                return Err("decision source names must not be empty".to_string());
            }
            if !names.insert(source.name.as_str()) {
                return Err(format!("duplicate decision source name: {}", source.name));
            }
            if !priorities.insert(source.priority) {
                return Err(format!("duplicate decision source priority: {}", source.priority));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> std::result::Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
