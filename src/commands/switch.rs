//! Switch the working tree to a checkpoint
//! Usage: vibe-check switch <ID>

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::commands::common::open_session;
use crate::error::Error;

pub fn execute(dir: &Path, id: String) -> Result<()> {
    let session = open_session(dir)?;

    match session.switch_to_checkpoint(&id) {
        Ok(()) => {
            println!("{} Switched to checkpoint {}", "✓".green().bold(), id.yellow());
            Ok(())
        }
        Err(Error::AlreadyAtTarget(id)) => {
            println!("{} Already on checkpoint {}", "·".dimmed(), id.yellow());
            Ok(())
        }
        Err(e @ Error::CheckoutFailed { .. }) => {
            eprintln!(
                "{} Commit or stash local changes before switching, or create a checkpoint first.",
                "hint:".cyan()
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
