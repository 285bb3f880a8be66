//! Squash the current checkpoint run into one commit and push it
//! Usage: vibe-check finalize [MESSAGE] [--yes]

use anyhow::{bail, Result};
use colored::Colorize;
use std::io;
use std::path::Path;

use crate::commands::common::{confirm, open_session};
use crate::squash::{FinalizePreview, FinalizeState};

pub fn execute(dir: &Path, message: Option<String>, yes: bool) -> Result<()> {
    let session = open_session(dir)?;

    let preview = session.preview()?;
    let plan = match &preview {
        FinalizePreview::NoCheckpoints => {
            println!("{} No checkpoints to finalize", "·".dimmed());
            return Ok(());
        }
        FinalizePreview::NotAtCheckpoint { current } => {
            bail!("Current commit {current} is not a checkpoint. Switch to a checkpoint before finalizing.");
        }
        FinalizePreview::Ready { plan } => plan,
    };
    print!("{preview}");

    if session.current_branch().is_none() {
        println!(
            "{} HEAD is detached; finalize will first check out one of [{}] and squash from there",
            "warning:".yellow().bold(),
            session.settings().primary_branches.join(", ")
        );
    }

    if plan.abandoned() > 0 {
        println!();
        println!(
            "{}",
            format!(
                "WARNING: {} newer checkpoint(s) will be permanently discarded",
                plan.abandoned()
            )
            .red()
            .bold()
        );
    }
    println!();

    if !yes {
        let prompt = format!(
            "Squash {} checkpoint(s) and force-push to {}?",
            plan.run.len(),
            session.settings().remote
        );
        if !confirm(&prompt, &mut io::stdin().lock())? {
            println!("Finalize cancelled");
            return Ok(());
        }
    }

    let outcome = session.finalize(message.as_deref())?;

    match outcome.state {
        FinalizeState::CleanedUp => {
            println!(
                "{} Squashed {} checkpoint(s) into {} and pushed {}",
                "✓".green().bold(),
                outcome.squashed,
                outcome.final_commit.as_deref().unwrap_or("?").yellow(),
                outcome.branch.cyan()
            );
            println!("  {}", outcome.message.dimmed());
        }
        FinalizeState::NothingToCommit => {
            println!(
                "{} Checkpoints made no changes relative to {}; nothing to commit",
                "·".dimmed(),
                outcome.base.yellow()
            );
        }
        FinalizeState::PartialFailure => {
            println!(
                "{} Commit {} created locally, but the push failed",
                "!".yellow().bold(),
                outcome.final_commit.as_deref().unwrap_or("?").yellow()
            );
            outcome.into_result()?;
        }
        other => bail!("Finalize stopped in unexpected state {other}"),
    }

    Ok(())
}
