//! The versioned-object store seen through git
//!
//! `Store` is the narrow set of repository primitives the checkpoint engine
//! needs. `GitStore` implements it by shelling out to `git` through the
//! bounded-wait runner.

use chrono::Local;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::runner::{run_git, run_git_bool, run_git_checked, GitOutput};
use crate::config::Settings;
use crate::error::StoreError;

/// Repository primitives consumed by discovery, lifecycle and finalize.
///
/// Log readers return raw `"<short id> <subject>"` lines. The event log is
/// ordered oldest to newest; the linear history newest to oldest.
pub trait Store {
    fn is_repository(&self) -> bool;

    /// Current branch name, `None` when HEAD is detached
    fn current_branch(&self) -> Result<Option<String>, StoreError>;

    /// Short id of the commit HEAD points at
    fn current_snapshot_id(&self) -> Result<String, StoreError>;

    fn working_tree_is_dirty(&self) -> Result<bool, StoreError>;

    /// True if the index differs from HEAD
    fn has_staged_changes(&self) -> Result<bool, StoreError>;

    fn stage_all(&self) -> Result<(), StoreError>;

    /// Commit the index. A refused commit is reported through `GitOutput::success`.
    fn commit(&self, message: &str) -> Result<GitOutput, StoreError>;

    fn branch_exists(&self, name: &str) -> bool;

    fn create_branch_ref(&self, name: &str, at: &str) -> Result<(), StoreError>;

    fn delete_branch_ref(&self, name: &str) -> Result<(), StoreError>;

    /// Move the branch pointer to `id`, keeping all content as staged changes
    fn soft_reset_to(&self, id: &str) -> Result<(), StoreError>;

    /// Move the branch pointer and index back to `target`, leaving the working tree untouched
    fn restore_to(&self, target: &str) -> Result<(), StoreError>;

    fn checkout(&self, target: &str) -> Result<(), StoreError>;

    /// Forced push that refuses to overwrite a remote that moved since last fetch
    fn push_with_conflict_check(&self, remote: &str, branch: &str)
        -> Result<GitOutput, StoreError>;

    fn read_event_log(&self) -> Result<Vec<String>, StoreError>;

    fn read_linear_history(&self) -> Result<Vec<String>, StoreError>;

    /// Irreversibly drop abandoned event-log entries and unreachable objects
    fn expire_event_log_and_compact(&self) -> Result<(), StoreError>;

    /// Current local time as display text
    fn now(&self) -> String;
}

/// `Store` backed by the git binary
#[derive(Debug, Clone)]
pub struct GitStore {
    repo_root: PathBuf,
    timeout: Duration,
    timestamp_format: String,
}

impl GitStore {
    pub fn new(repo_root: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            repo_root: repo_root.into(),
            timeout: settings.command_timeout(),
            timestamp_format: settings.timestamp_format.clone(),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Top-level directory of the working tree containing `dir`, if any
    pub fn toplevel(dir: &Path, timeout: Duration) -> Option<PathBuf> {
        run_git_checked(&["rev-parse", "--show-toplevel"], dir, timeout)
            .ok()
            .map(PathBuf::from)
    }

    fn run(&self, args: &[&str]) -> Result<GitOutput, StoreError> {
        run_git(args, &self.repo_root, self.timeout)
    }

    fn checked(&self, args: &[&str]) -> Result<String, StoreError> {
        run_git_checked(args, &self.repo_root, self.timeout)
    }

    fn has_commits(&self) -> bool {
        run_git_bool(
            &["rev-parse", "--verify", "--quiet", "HEAD"],
            &self.repo_root,
            self.timeout,
        )
    }

    fn read_lines(&self, args: &[&str]) -> Result<Vec<String>, StoreError> {
        // An unborn branch has no log at all; git reports that as an error.
        if !self.has_commits() {
            return Ok(Vec::new());
        }
        let stdout = self.checked(args)?;
        Ok(stdout.lines().map(str::to_string).collect())
    }
}

impl Store for GitStore {
    fn is_repository(&self) -> bool {
        run_git_bool(&["rev-parse", "--git-dir"], &self.repo_root, self.timeout)
    }

    fn current_branch(&self) -> Result<Option<String>, StoreError> {
        let branch = self.checked(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(if branch == "HEAD" { None } else { Some(branch) })
    }

    fn current_snapshot_id(&self) -> Result<String, StoreError> {
        self.checked(&["rev-parse", "--short", "HEAD"])
    }

    fn working_tree_is_dirty(&self) -> Result<bool, StoreError> {
        let status = self.checked(&["status", "--porcelain"])?;
        Ok(!status.trim().is_empty())
    }

    fn has_staged_changes(&self) -> Result<bool, StoreError> {
        let staged = self.checked(&["diff", "--cached", "--name-only"])?;
        Ok(!staged.trim().is_empty())
    }

    fn stage_all(&self) -> Result<(), StoreError> {
        self.checked(&["add", "-A"]).map(|_| ())
    }

    fn commit(&self, message: &str) -> Result<GitOutput, StoreError> {
        self.run(&["commit", "-m", message])
    }

    fn branch_exists(&self, name: &str) -> bool {
        let reference = format!("refs/heads/{name}");
        run_git_bool(
            &["rev-parse", "--verify", "--quiet", &reference],
            &self.repo_root,
            self.timeout,
        )
    }

    fn create_branch_ref(&self, name: &str, at: &str) -> Result<(), StoreError> {
        self.checked(&["branch", name, at]).map(|_| ())
    }

    fn delete_branch_ref(&self, name: &str) -> Result<(), StoreError> {
        self.checked(&["branch", "-D", name]).map(|_| ())
    }

    fn soft_reset_to(&self, id: &str) -> Result<(), StoreError> {
        self.checked(&["reset", "--soft", id]).map(|_| ())
    }

    fn restore_to(&self, target: &str) -> Result<(), StoreError> {
        self.checked(&["reset", "--mixed", target]).map(|_| ())
    }

    fn checkout(&self, target: &str) -> Result<(), StoreError> {
        self.checked(&["checkout", target]).map(|_| ())
    }

    fn push_with_conflict_check(
        &self,
        remote: &str,
        branch: &str,
    ) -> Result<GitOutput, StoreError> {
        self.run(&["push", "--force-with-lease", remote, branch])
    }

    fn read_event_log(&self) -> Result<Vec<String>, StoreError> {
        // git prints the reflog newest first; callers expect oldest first.
        let mut lines = self.read_lines(&["reflog", "--format=%h %s"])?;
        lines.reverse();
        debug!(entries = lines.len(), "read event log");
        Ok(lines)
    }

    fn read_linear_history(&self) -> Result<Vec<String>, StoreError> {
        self.read_lines(&["log", "--format=%h %s"])
    }

    fn expire_event_log_and_compact(&self) -> Result<(), StoreError> {
        self.checked(&["reflog", "expire", "--expire=now", "--all"])?;
        self.checked(&["gc", "--prune=now", "--quiet"])?;
        Ok(())
    }

    fn now(&self) -> String {
        let mut out = String::new();
        if write!(out, "{}", Local::now().format(&self.timestamp_format)).is_err() {
            return "unknown".to_string();
        }
        out
    }
}
