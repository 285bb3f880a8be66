//! Helpers shared by the subcommands.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::git::check_git_available;
use crate::session::Session;

/// Open the repository containing `dir`.
pub fn open_session(dir: &Path) -> Result<Session> {
    check_git_available()?;
    Session::open(dir).with_context(|| format!("Cannot use repository at {}", dir.display()))
}

/// Collapse to one line and cut to `max_len` characters.
pub fn truncate_for_display(s: &str, max_len: usize) -> String {
    let single_line: String = s.lines().collect::<Vec<_>>().join(" ");

    if single_line.chars().count() <= max_len {
        single_line
    } else {
        let truncated: String = single_line
            .chars()
            .take(max_len.saturating_sub(1))
            .collect();
        format!("{truncated}…")
    }
}

/// Ask a yes/no question on stdout and read the answer from `input`.
///
/// Anything other than `y` or `yes` is a no.
pub fn confirm(prompt: &str, input: &mut dyn BufRead) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
