//! User configuration for the `tl` command.
//!
//! Read from `<config_dir>/tasklink/config.yaml` when present:
//!
//! ```yaml
//! store_path: /home/me/notes/tasks.json
//! digest_top_tags: 5
//! ```

use crate::digest::DEFAULT_TOP_TAGS;
use crate::storage::DEFAULT_FILE;
use eyre::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name within the tasklink config directory.
const CONFIG_FILE: &str = "config.yaml";

/// Settings read from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Task file to use when none is given on the command line
    pub store_path: Option<PathBuf>,

    /// Number of tags listed by `tl digest`
    pub digest_top_tags: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            digest_top_tags: DEFAULT_TOP_TAGS,
        }
    }
}

impl Config {
    /// Location of the per-user config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tasklink").join(CONFIG_FILE))
    }

    /// Load config from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&raw).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Load from `path` if given, else from [`Config::default_path`].
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Pick the task file: `explicit` first, then `store_path`, then
    /// [`DEFAULT_FILE`] in the working directory.
    pub fn resolve_store_path(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| self.store_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE))
    }
}
