//! User configuration and data directory resolution

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::task::DEFAULT_RETENTION_DAYS;

/// Task document, inside the app dir
pub const TASKS_FILE: &str = "tasks.json";

/// Interruption state document, inside the app dir
pub const FOCUS_FILE: &str = "focus.json";

/// Markdown export target, inside the app dir
pub const EXPORT_FILE: &str = "TASKS.md";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Completed tasks older than this are dropped on load
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    #[serde(default)]
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            export: ExportConfig::default(),
        }
    }
}

fn default_retention_days() -> i64 {
    DEFAULT_RETENTION_DAYS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Mirror the task document to TASKS.md after every write
    #[serde(default = "default_true")]
    pub markdown: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { markdown: true }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load `config.toml` from the app dir; a missing file means defaults
    pub fn load_from(app_dir: &Path) -> Result<Self> {
        let path = app_dir.join("config.toml");
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Default data directory: `~/.sidetrack`, created on demand
pub fn default_app_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
        .join(".sidetrack");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
