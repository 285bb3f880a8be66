//! Squashing a run of checkpoints into one published commit
//!
//! - `planner` picks the run and the base without side effects
//! - `preview` renders the plan for confirmation
//! - `executor` carries it out through the `state` machine

pub mod executor;
pub mod planner;
pub mod preview;
pub mod state;

pub use executor::{finalize, recovery_command, FinalizeOutcome, Finalizer};
pub use planner::{plan, SquashPlan};
pub use preview::{preview, FinalizePreview};
pub use state::{FinalizeState, Rollback};
