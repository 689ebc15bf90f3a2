use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::validation::ValidationMode;

/// Runtime configuration handed to each component at construction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding the listing documents
    pub database_path: PathBuf,
    /// Currency requested from the details source
    pub currency: String,
    /// Directory for raw payload dumps; `None` disables them
    pub debug_dump_dir: Option<PathBuf>,
    /// Required-field contract applied before a record is stored
    pub validation: ValidationMode,
    /// Base URL of the external details service
    pub details_endpoint: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./db/database.db"),
            currency: "SGD".to_string(),
            debug_dump_dir: Some(default_dump_dir()),
            validation: ValidationMode::Standard,
            details_endpoint: None,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; keys left out keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_dump_dir() -> PathBuf {
    let tmp = PathBuf::from("/tmp");
    if tmp.is_dir() {
        tmp
    } else {
        PathBuf::from(".")
    }
}
