//! Git access for the checkpoint engine
//!
//! This module provides:
//! - A bounded-wait runner for git invocations
//! - The `Store` trait the engine is written against
//! - `GitStore`, the implementation backed by the git binary

pub mod runner;
pub mod store;


pub use runner::{run_git, run_git_bool, run_git_checked, GitOutput};
pub use store::{GitStore, Store};

use anyhow::{bail, Context, Result};

/// Check that a usable git binary is on PATH
pub fn check_git_available() -> Result<()> {
    let git = which::which("git").context("Git is not installed or not in PATH")?;

    let output = std::process::Command::new(&git)
        .args(["--version"])
        .output()
        .with_context(|| format!("Failed to execute {}", git.display()))?;

    if !output.status.success() {
        bail!("Git is not working properly");
    }

    Ok(())
}
