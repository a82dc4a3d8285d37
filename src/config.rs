//! Engine configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult};

fn default_max_depth() -> u32 {
    3
}

fn default_db_path() -> PathBuf {
    PathBuf::from("menu_tree.db")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Deepest allowed menu level (top level is 1)
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// SQLite database file, `:memory:` for a throwaway store
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            db_path: default_db_path(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> DomainResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| DomainError::Validation(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> DomainResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Validation(format!("Failed to read config {}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&raw)?;
        log::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.max_depth == 0 {
            return Err(DomainError::Validation("maxDepth must be at least 1".to_string()));
        }
        Ok(())
    }
}
