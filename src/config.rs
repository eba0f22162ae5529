//! Persisted exclude-label preferences.
//!
//! The preference file is YAML by default; a `.json` extension switches to
//! JSON. A missing file is not an error and yields the default list.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::BoxCountError;

/// Default location of the preference file, relative to the working
/// directory.
pub const DEFAULT_CONFIG_FILE: &str = ".boxcount.yaml";

/// Labels excluded when no preference file exists yet.
pub const DEFAULT_EXCLUDE_LABELS: [&str; 1] = ["_corrupt"];

/// User preferences that survive between runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludeConfig {
    #[serde(default)]
    pub exclude_labels: Vec<String>,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            exclude_labels: DEFAULT_EXCLUDE_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExcludeConfig {
    /// Load preferences from `path`, or the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, BoxCountError> {
        if !path.exists() {
            debug!("no config at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)?;
        let parsed = if is_json(path) {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&text).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| BoxCountError::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Write preferences to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), BoxCountError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let text = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| e.to_string())
        } else {
            serde_yaml::to_string(self).map_err(|e| e.to_string())
        }
        .map_err(|message| BoxCountError::ConfigWrite {
            path: path.to_path_buf(),
            message,
        })?;

        fs::write(path, text)?;
        Ok(())
    }

    /// Adds a label. Surrounding whitespace is trimmed; empty or already
    /// present labels are ignored. Returns true if the list changed.
    pub fn add(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.exclude_labels.iter().any(|l| l == label) {
            return false;
        }
        self.exclude_labels.push(label.to_string());
        true
    }

    /// Removes every exact occurrence of `label`. Returns true if the list
    /// changed.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.exclude_labels.len();
        self.exclude_labels.retain(|l| l != label);
        self.exclude_labels.len() != before
    }
}

/// Resolve the preference file location from an optional override.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
