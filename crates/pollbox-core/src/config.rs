//! Configuration management for pollbox

use crate::comment::CascadePolicy;
use crate::error::{PollboxError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Poll settings
    pub poll: PollConfig,
    /// Comment settings
    pub comment: CommentConfig,
    /// Statistics settings
    pub stats: StatsConfig,
    /// Storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when it is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No configuration at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| PollboxError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PollboxError::Toml(e.to_string()))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let [yes, no] = &self.poll.binary_labels;
        if yes.trim().is_empty() || no.trim().is_empty() || yes == no {
            return Err(PollboxError::Validation(
                "poll.binary_labels must be two distinct, non-empty labels".to_string(),
            ));
        }
        if self.comment.max_length == 0 {
            return Err(PollboxError::Validation(
                "comment.max_length must be greater than zero".to_string(),
            ));
        }
        let window = self.stats.trending_window_days;
        if !(1..=MAX_TRENDING_WINDOW_DAYS).contains(&window) {
            return Err(PollboxError::Validation(format!(
                "stats.trending_window_days must be between 1 and {}, got {}",
                MAX_TRENDING_WINDOW_DAYS, window
            )));
        }
        Ok(())
    }
}

/// Poll-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Fixed option labels of binary polls
    pub binary_labels: [String; 2],
    /// Maximum poll title length
    pub max_title_length: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            binary_labels: ["Yes".to_string(), "No".to_string()],
            max_title_length: 200,
        }
    }
}

/// Comment-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    /// Maximum comment content length
    pub max_length: usize,
    /// How deleting a comment treats its replies
    pub cascade: CascadePolicy,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            max_length: 2000,
            cascade: CascadePolicy::default(),
        }
    }
}

/// Longest accepted trending window, roughly a century
pub const MAX_TRENDING_WINDOW_DAYS: i64 = 36_500;

/// Statistics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Look-back window for trending polls, in days
    pub trending_window_days: i64,
    /// Number of trending polls returned
    pub trending_limit: usize,
    /// Number of recent votes listed in user statistics
    pub recent_votes_limit: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            trending_window_days: 7,
            trending_limit: 10,
            recent_votes_limit: 10,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the data file
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".pollbox"),
        }
    }
}
