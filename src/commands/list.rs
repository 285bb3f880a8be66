//! List checkpoints newest first
//! Usage: vibe-check list [--json]

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::checkpoints::{Checkpoint, CheckpointList};
use crate::commands::common::{open_session, truncate_for_display};

const SUMMARY_WIDTH: usize = 72;

#[derive(Serialize)]
struct ListOutput<'a> {
    current: Option<&'a str>,
    checkpoints: &'a CheckpointList,
}

pub fn execute(dir: &Path, json: bool) -> Result<()> {
    let session = open_session(dir)?;
    let list = session.list_checkpoints()?;
    let current = session.current_id();

    if json {
        let output = ListOutput {
            current: current.as_deref(),
            checkpoints: &list,
        };
        let text = serde_json::to_string_pretty(&output).context("Failed to serialize checkpoints")?;
        println!("{text}");
        return Ok(());
    }

    println!("Checkpoints:");
    println!("{}", "─".repeat(50).dimmed());

    if !list.has_checkpoints() {
        println!("(no checkpoints)");
    }
    for entry in &list {
        println!("{}", format_entry(entry, current.as_deref() == Some(entry.id.as_str())));
    }

    Ok(())
}

fn format_entry(entry: &Checkpoint, is_current: bool) -> String {
    let marker = if is_current {
        "*".green().bold().to_string()
    } else {
        " ".to_string()
    };
    let summary = truncate_for_display(&entry.summary, SUMMARY_WIDTH);
    let summary = if entry.is_sentinel {
        summary.dimmed().to_string()
    } else {
        summary
    };
    format!("{marker} {} {summary}", entry.id.yellow())
}
