use endtally_game::{DEFAULT_SAVE_KEY, DEFAULT_SIDE_A_LABEL, DEFAULT_SIDE_B_LABEL, Side};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Scorekeeper settings. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardConfig {
    pub side_a_label: String,
    pub side_b_label: String,
    pub save_key: String,
    pub data_dir: PathBuf,
}

impl Default for ScorecardConfig {
    fn default() -> Self {
        Self {
            side_a_label: DEFAULT_SIDE_A_LABEL.to_string(),
            side_b_label: DEFAULT_SIDE_B_LABEL.to_string(),
            save_key: DEFAULT_SAVE_KEY.to_string(),
            data_dir: PathBuf::from("."),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must not be empty")]
    EmptyLabel { field: &'static str },
    #[error("both sides are labelled {0:?}")]
    DuplicateLabels(String),
    #[error("save key {0:?} must be non-empty and must not contain path separators")]
    InvalidKey(String),
}

impl ScorecardConfig {
    /// Read a JSON config file, or defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the invariants the scorekeeper relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.side_a_label.trim().is_empty() {
            return Err(ConfigError::EmptyLabel {
                field: "side_a_label",
            });
        }
        if self.side_b_label.trim().is_empty() {
            return Err(ConfigError::EmptyLabel {
                field: "side_b_label",
            });
        }
        if self.side_a_label.trim() == self.side_b_label.trim() {
            return Err(ConfigError::DuplicateLabels(self.side_a_label.clone()));
        }
        let key = self.save_key.as_str();
        if key.trim().is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(ConfigError::InvalidKey(self.save_key.clone()));
        }
        Ok(())
    }

    /// Display label for a side; ties are labelled "Tie".
    #[must_use]
    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::A => &self.side_a_label,
            Side::B => &self.side_b_label,
            Side::Tie => "Tie",
        }
    }
}
