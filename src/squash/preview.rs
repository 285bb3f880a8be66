//! Read-only description of what finalize would do from the current position

use serde::Serialize;
use std::fmt;

use super::planner::{self, SquashPlan};
use crate::checkpoints::discover;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::git::Store;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FinalizePreview {
    NoCheckpoints,
    NotAtCheckpoint { current: String },
    Ready { plan: SquashPlan },
}

impl FinalizePreview {
    pub fn plan(&self) -> Option<&SquashPlan> {
        match self {
            FinalizePreview::Ready { plan } => Some(plan),
            _ => None,
        }
    }
}

/// Compute the preview without touching the repository.
///
/// Only `NoBaseFound` and store failures are errors; the other reasons
/// finalize would refuse are reported as preview states.
pub fn preview(store: &dyn Store, settings: &Settings) -> Result<FinalizePreview> {
    if !store.is_repository() {
        return Err(Error::NotARepository);
    }

    let tag = settings.tag();
    let list = discover(store, &tag, &settings.last_commit_prefix)?;
    if !list.has_checkpoints() {
        return Ok(FinalizePreview::NoCheckpoints);
    }

    let current = store.current_snapshot_id()?;
    match planner::plan(&list, &current, store, &tag) {
        Ok(plan) => Ok(FinalizePreview::Ready { plan }),
        Err(Error::NotAtCheckpoint(current)) => Ok(FinalizePreview::NotAtCheckpoint { current }),
        Err(e) => Err(e),
    }
}

impl fmt::Display for FinalizePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalizePreview::NoCheckpoints => writeln!(f, "No checkpoints found"),
            FinalizePreview::NotAtCheckpoint { current } => {
                writeln!(f, "Current commit {current} is not a checkpoint")
            }
            FinalizePreview::Ready { plan } => {
                writeln!(f, "Will squash {} consecutive checkpoints", plan.run.len())?;
                if plan.abandoned() > 0 {
                    writeln!(f, "Will remove {} newer checkpoints", plan.abandoned())?;
                }
                writeln!(f)?;
                writeln!(f, "Checkpoints to be squashed:")?;
                for (i, checkpoint) in plan.run.iter().enumerate() {
                    let marker = if i == 0 { "> " } else { "  " };
                    writeln!(f, "{marker}{} {}", checkpoint.id, checkpoint.summary)?;
                }
                writeln!(f)?;
                writeln!(f, "Onto base {}", plan.base)
            }
        }
    }
}
