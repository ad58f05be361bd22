use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::{DEFAULT_MAX_CLAUSE_COUNT, SEARCH_CONFIG_FILE};
use crate::common::file_operations::{atomic_save_json, read_json, FileOperationError};
use crate::Result;

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Default, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub struct SimilarityConfig {
    /// Tokens with a zero position increment don't count towards the field length.
    #[serde(default)]
    pub discount_overlaps: bool,
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub struct CollectorConfig {
    #[serde(default = "default_true")]
    pub pre_populate: bool,

    /// Ask scorers for in-order docs; the top-k collector relies on it to break ties cheaply.
    #[serde(default = "default_true")]
    pub docs_in_order: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self { pre_populate: true, docs_in_order: true }
    }
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    #[serde(default)]
    pub similarity: SimilarityConfig,

    #[serde(default)]
    pub collector: CollectorConfig,

    #[serde(default = "default_max_clause_count")]
    pub max_clause_count: usize,

    /// Only used by sorted searches, relevance searches always know their max score.
    #[serde(default)]
    pub track_max_score: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityConfig::default(),
            collector: CollectorConfig::default(),
            max_clause_count: DEFAULT_MAX_CLAUSE_COUNT,
            track_max_score: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_clause_count() -> usize {
    DEFAULT_MAX_CLAUSE_COUNT
}

impl SearchConfig {
    pub fn load(config_dir: &Path) -> Result<Self> {
        let file_path = config_dir.join(SEARCH_CONFIG_FILE);
        Ok(read_json(&file_path)?)
    }

    pub fn save(&self, config_dir: &Path) -> Result<()> {
        let file_path = config_dir.join(SEARCH_CONFIG_FILE);
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir).map_err(FileOperationError::IoError)?;
        }
        Ok(atomic_save_json(&file_path, self)?)
    }
}
