//! Show which actions are available right now
//! Usage: vibe-check status [--watch]

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;

use crate::commands::common::open_session;
use crate::session::{Affordances, StatusPoller};

pub fn execute(dir: &Path, watch: bool) -> Result<()> {
    let session = open_session(dir)?;

    let branch = session
        .current_branch()
        .unwrap_or_else(|| "(detached HEAD)".to_string());
    let current = session.current_id().unwrap_or_else(|| "(no commits)".to_string());
    println!("On {} at {}", branch.cyan(), current.yellow());

    if !watch {
        print_affordances(&session.affordances());
        return Ok(());
    }

    let interval = session.settings().poll_interval();
    let session = Arc::new(session);
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .context("Failed to set Ctrl+C handler")?;

    println!(
        "{}",
        format!("Watching every {}s, Ctrl+C to stop", interval.as_secs()).dimmed()
    );
    let poller = StatusPoller::spawn(Arc::clone(&session), interval, |affordances| {
        println!("{}", Local::now().format("%H:%M:%S").to_string().dimmed());
        print_affordances(affordances);
    });

    let _ = stop_rx.recv();
    poller.cancel();
    Ok(())
}

fn print_affordances(affordances: &Affordances) {
    println!("  {}", line("create checkpoint", affordances.can_create));
    println!("  {}", line("switch checkpoint", affordances.can_switch));
    println!("  {}", line("finalize", affordances.can_finalize));
    if let Some(reason) = &affordances.reason {
        println!("  {}", format!("({reason})").dimmed());
    }
}

fn line(label: &str, enabled: bool) -> String {
    if enabled {
        format!("{} {label}", "✓".green().bold())
    } else {
        format!("{} {}", "✗".dimmed(), label.dimmed())
    }
}
