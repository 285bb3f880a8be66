//! Checkpoint discovery
//!
//! Checkpoints are found by merging two sources:
//! - the event log (reflog), which still holds positions abandoned by
//!   navigation, e.g. checkpoints made after switching back to an older one
//! - the linear history, which supplies the most recent non-checkpoint
//!   commit appended as the "last real commit" sentinel
//!
//! Neither source alone yields both, so both are always queried.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::types::{Checkpoint, CheckpointList, CheckpointTag};
use crate::error::Result;
use crate::git::Store;

static LOG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9a-fA-F]{4,64})\s+(\S.*)$").expect("log line pattern is valid")
});

/// Split a `"<short id> <subject>"` log line. Malformed lines yield `None`.
pub fn parse_log_line(line: &str) -> Option<(&str, &str)> {
    let caps = LOG_LINE.captures(line.trim())?;
    let id = caps.get(1)?.as_str();
    let subject = caps.get(2)?.as_str();
    Some((id, subject))
}

/// Discover checkpoints, newest first, with the last real commit appended.
///
/// Fails with `StoreUnavailable` only when the event log cannot be read. A
/// failure to read the linear history just omits the sentinel.
pub fn discover(
    store: &dyn Store,
    tag: &CheckpointTag,
    last_commit_prefix: &str,
) -> Result<CheckpointList> {
    let lines = store.read_event_log()?;

    // Oldest first, so the first occurrence of an id is where it was created.
    let mut tagged: Vec<Checkpoint> = Vec::new();
    for line in &lines {
        let Some((id, subject)) = parse_log_line(line) else {
            continue;
        };
        if tag.matches(subject) && !tagged.iter().any(|c| c.id == id) {
            tagged.push(Checkpoint::tagged(id, subject));
        }
    }
    tagged.reverse();

    let sentinel = match last_real_commit(store, tag) {
        Ok(found) => found.map(|commit| {
            Checkpoint::sentinel(commit.id, format!("{last_commit_prefix}{}", commit.summary))
        }),
        Err(err) => {
            debug!(error = %err, "linear history unavailable, omitting last real commit");
            None
        }
    };

    let list = CheckpointList::new(tagged, sentinel);
    debug!(
        log_entries = lines.len(),
        checkpoints = list.checkpoint_count(),
        sentinel = list.sentinel().is_some(),
        "discovered checkpoints"
    );
    Ok(list)
}

/// Most recent commit in the linear history whose subject is not tagged.
///
/// The returned entry carries the raw subject, without any display prefix.
pub fn last_real_commit(store: &dyn Store, tag: &CheckpointTag) -> Result<Option<Checkpoint>> {
    let history = store.read_linear_history()?;

    Ok(history
        .iter()
        .filter_map(|line| parse_log_line(line))
        .find(|(_, subject)| !tag.matches(subject))
        .map(|(id, subject)| Checkpoint::untagged(id, subject)))
}
