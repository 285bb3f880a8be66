use serde::Serialize;
use std::fmt;

/// Progress of a finalize run.
///
/// `CleanedUp`, `Aborted`, `PartialFailure` and `NothingToCommit` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizeState {
    Start,
    BranchNormalized,
    PlanComputed,
    BackedUp,
    Reset,
    Committed,
    Pushed,
    CleanedUp,
    /// Nothing destructive happened, or it was fully rolled back
    Aborted,
    /// The squash commit exists locally but the push failed
    PartialFailure,
    /// The squashed checkpoints left no difference from the base
    NothingToCommit,
}

/// Cleanup owed when a step fails after reaching a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollback {
    Nothing,
    /// Hard-reset to the backup ref, then delete it
    RestoreBackup,
    /// Delete the backup ref and keep the new commit
    DropBackup,
}

impl FinalizeState {
    /// Check if moving from this state to `next` is valid.
    ///
    /// Valid transitions:
    /// - `Start` -> `BranchNormalized` | `Aborted`
    /// - `BranchNormalized` -> `PlanComputed` | `Aborted`
    /// - `PlanComputed` -> `BackedUp` | `Aborted`
    /// - `BackedUp` -> `Reset` | `Aborted`
    /// - `Reset` -> `Committed` | `NothingToCommit` | `Aborted`
    /// - `Committed` -> `Pushed` | `PartialFailure`
    /// - `Pushed` -> `CleanedUp`
    pub fn can_transition_to(&self, next: FinalizeState) -> bool {
        use FinalizeState::*;
        match self {
            Start => matches!(next, BranchNormalized | Aborted),
            BranchNormalized => matches!(next, PlanComputed | Aborted),
            PlanComputed => matches!(next, BackedUp | Aborted),
            BackedUp => matches!(next, Reset | Aborted),
            Reset => matches!(next, Committed | NothingToCommit | Aborted),
            Committed => matches!(next, Pushed | PartialFailure),
            Pushed => matches!(next, CleanedUp),
            CleanedUp | Aborted | PartialFailure | NothingToCommit => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FinalizeState::CleanedUp
                | FinalizeState::Aborted
                | FinalizeState::PartialFailure
                | FinalizeState::NothingToCommit
        )
    }

    /// What must be undone if the step leaving this state fails
    pub fn rollback(&self) -> Rollback {
        match self {
            FinalizeState::BackedUp | FinalizeState::Reset => Rollback::RestoreBackup,
            FinalizeState::Committed | FinalizeState::Pushed => Rollback::DropBackup,
            _ => Rollback::Nothing,
        }
    }
}

impl fmt::Display for FinalizeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalizeState::Start => write!(f, "Start"),
            FinalizeState::BranchNormalized => write!(f, "BranchNormalized"),
            FinalizeState::PlanComputed => write!(f, "PlanComputed"),
            FinalizeState::BackedUp => write!(f, "BackedUp"),
            FinalizeState::Reset => write!(f, "Reset"),
            FinalizeState::Committed => write!(f, "Committed"),
            FinalizeState::Pushed => write!(f, "Pushed"),
            FinalizeState::CleanedUp => write!(f, "CleanedUp"),
            FinalizeState::Aborted => write!(f, "Aborted"),
            FinalizeState::PartialFailure => write!(f, "PartialFailure"),
            FinalizeState::NothingToCommit => write!(f, "NothingToCommit"),
        }
    }
}
