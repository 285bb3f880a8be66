//! Creating checkpoints and moving between them

use tracing::{debug, info};

use super::types::{Checkpoint, CheckpointTag};
use crate::diagnosis::{diagnose, FailureKind};
use crate::error::{Error, Result};
use crate::git::Store;

/// Stage every pending change and record it as a new checkpoint commit.
///
/// An empty or whitespace-only note is the same as no note.
pub fn create(store: &dyn Store, tag: &CheckpointTag, note: Option<&str>) -> Result<Checkpoint> {
    if !store.is_repository() {
        return Err(Error::NotARepository);
    }
    if !store.working_tree_is_dirty()? {
        return Err(Error::NothingToCheckpoint);
    }

    store.stage_all()?;

    let message = tag.message(&store.now(), note);
    let output = store.commit(&message)?;
    if !output.success {
        return Err(Error::CommitFailed {
            message: output.message(),
            diagnosis: diagnose(FailureKind::Commit, &output.stdout, &output.stderr),
        });
    }

    let id = store.current_snapshot_id()?;
    info!(%id, %message, "created checkpoint");
    Ok(Checkpoint::tagged(id, message))
}

/// Move the working tree and HEAD to checkpoint `id`.
///
/// Switching to the commit HEAD already points at is refused without
/// touching the store.
pub fn switch_to(store: &dyn Store, id: &str) -> Result<()> {
    if !store.is_repository() {
        return Err(Error::NotARepository);
    }

    let id = id.trim();
    if let Ok(current) = store.current_snapshot_id() {
        if current == id {
            return Err(Error::AlreadyAtTarget(id.to_string()));
        }
    }

    store.checkout(id).map_err(|e| Error::CheckoutFailed {
        id: id.to_string(),
        message: e.to_string(),
    })?;
    debug!(%id, "switched to checkpoint");
    Ok(())
}
