//! Settings for checkpoint naming, finalize targets and git timeouts
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. `<config_dir>/vibe-check/config.toml`
//! 3. `<repo>/.vibe-check.toml`
//! 4. `VIBE_CHECK_REMOTE` / `VIBE_CHECK_TIMEOUT_SECS`

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::checkpoints::CheckpointTag;
use crate::error::{Error, Result};

/// Name of the per-repository settings file
pub const REPO_CONFIG_FILE: &str = ".vibe-check.toml";

pub const ENV_REMOTE: &str = "VIBE_CHECK_REMOTE";
pub const ENV_TIMEOUT_SECS: &str = "VIBE_CHECK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Remote that finalize pushes to
    pub remote: String,
    /// Branches tried, in order, when finalize starts from a detached HEAD
    pub primary_branches: Vec<String>,
    /// Text that marks a commit message as a checkpoint
    pub checkpoint_tag: String,
    /// Display prefix for the last real commit appended to checkpoint lists
    pub last_commit_prefix: String,
    /// Prefix of the temporary recovery branch created by finalize
    pub backup_prefix: String,
    /// chrono format string for checkpoint and auto-commit timestamps
    pub timestamp_format: String,
    /// Upper bound on any single git invocation
    pub command_timeout_secs: u64,
    /// Status poller refresh cadence
    pub poll_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            primary_branches: vec!["main".to_string(), "master".to_string()],
            checkpoint_tag: "CHECKPOINT:".to_string(),
            last_commit_prefix: "[LAST COMMIT] ".to_string(),
            backup_prefix: "vibe-check-backup".to_string(),
            timestamp_format: "%d/%m/%Y %H:%M".to_string(),
            command_timeout_secs: 120,
            poll_interval_secs: 2,
        }
    }
}

impl Settings {
    /// Load settings for a repository rooted at `repo_root`.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let global = dirs::config_dir().map(|dir| dir.join("vibe-check").join("config.toml"));
        let files: Vec<PathBuf> = global
            .into_iter()
            .chain(std::iter::once(repo_root.join(REPO_CONFIG_FILE)))
            .collect();

        let mut settings = Self::from_files(&files)?;
        settings.apply_env(
            std::env::var(ENV_REMOTE).ok(),
            std::env::var(ENV_TIMEOUT_SECS).ok(),
        )?;
        settings.validate()?;
        Ok(settings)
    }

    /// Merge the given TOML files over the defaults; missing files are skipped.
    pub fn from_files(files: &[PathBuf]) -> Result<Self> {
        let mut merged = toml::Table::new();
        for path in files {
            if !path.is_file() {
                continue;
            }
            debug!(path = %path.display(), "reading settings");
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
            let table: toml::Table = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;
            merged.extend(table);
        }

        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| Error::Config(e.to_string()))
    }

    fn apply_env(&mut self, remote: Option<String>, timeout: Option<String>) -> Result<()> {
        if let Some(remote) = remote.filter(|r| !r.trim().is_empty()) {
            self.remote = remote.trim().to_string();
        }
        if let Some(raw) = timeout {
            self.command_timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{ENV_TIMEOUT_SECS} must be an integer, got '{raw}'")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.checkpoint_tag.trim().is_empty() {
            return Err(Error::Config("checkpoint_tag must not be empty".to_string()));
        }
        if self.primary_branches.is_empty() {
            return Err(Error::Config(
                "primary_branches must name at least one branch".to_string(),
            ));
        }
        if self.remote.trim().is_empty() {
            return Err(Error::Config("remote must not be empty".to_string()));
        }
        if self.command_timeout_secs == 0 {
            return Err(Error::Config(
                "command_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!(
                "timestamp_format '{}' is not a valid chrono format",
                self.timestamp_format
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(Error::Config(
                "poll_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn tag(&self) -> CheckpointTag {
        CheckpointTag::new(self.checkpoint_tag.clone())
    }
}
