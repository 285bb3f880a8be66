//! Choosing which checkpoints to fold and the commit to fold them onto

use serde::Serialize;
use tracing::debug;

use crate::checkpoints::{last_real_commit, Checkpoint, CheckpointList, CheckpointTag};
use crate::error::{Error, Result};
use crate::git::Store;

/// The contiguous run of checkpoints to squash and the base they land on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquashPlan {
    /// Starts at the current position, newest first
    pub run: Vec<Checkpoint>,
    /// Id the branch is soft-reset to; never a member of `run`
    pub base: String,
    /// Index of the current position in the discovered list
    pub current_index: usize,
}

impl SquashPlan {
    /// Checkpoints newer than the current position. The squash abandons them.
    pub fn abandoned(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &Checkpoint {
        &self.run[0]
    }
}

/// Plan a squash from `current_id`.
///
/// The run extends from the current entry toward older entries while they
/// are tagged. The base is the entry just past the run, or, when the run
/// reaches the end of the list, the most recent untagged commit in the
/// linear history.
pub fn plan(
    list: &CheckpointList,
    current_id: &str,
    store: &dyn Store,
    tag: &CheckpointTag,
) -> Result<SquashPlan> {
    let current_index = list
        .position(current_id)
        .filter(|&i| list.entries()[i].is_checkpoint)
        .ok_or_else(|| Error::NotAtCheckpoint(current_id.to_string()))?;

    let run: Vec<Checkpoint> = list.entries()[current_index..]
        .iter()
        .take_while(|entry| entry.is_checkpoint)
        .cloned()
        .collect();

    let next = current_index + run.len();
    let base = match list.get(next) {
        Some(entry) => entry.id.clone(),
        None => last_real_commit(store, tag)?
            .map(|commit| commit.id)
            .ok_or(Error::NoBaseFound)?,
    };

    debug!(
        current = %current_id,
        run = run.len(),
        %base,
        abandoned = current_index,
        "planned squash"
    );

    Ok(SquashPlan {
        run,
        base,
        current_index,
    })
}
