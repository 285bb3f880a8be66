//! Show what finalize would do, without doing it
//! Usage: vibe-check preview

use anyhow::Result;
use std::path::Path;

use crate::commands::common::open_session;

pub fn execute(dir: &Path) -> Result<()> {
    let session = open_session(dir)?;
    print!("{}", session.preview()?);
    Ok(())
}
