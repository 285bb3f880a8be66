//! Create a checkpoint from the pending changes
//! Usage: vibe-check create [NOTE]

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::commands::common::open_session;
use crate::error::Error;

pub fn execute(dir: &Path, note: Option<String>) -> Result<()> {
    let session = open_session(dir)?;

    match session.create_checkpoint(note.as_deref()) {
        Ok(checkpoint) => {
            println!(
                "{} Created checkpoint {} {}",
                "✓".green().bold(),
                checkpoint.id.yellow(),
                checkpoint.summary.dimmed()
            );
            Ok(())
        }
        Err(Error::NothingToCheckpoint) => {
            println!("{} No changes to checkpoint", "·".dimmed());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
