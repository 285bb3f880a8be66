//! Checkpoints: tagged work-in-progress commits
//!
//! A checkpoint is an ordinary commit whose subject carries the checkpoint
//! tag. Nothing about checkpoints is persisted outside git; every listing is
//! rebuilt from the event log and linear history.

pub mod discovery;
pub mod lifecycle;
pub mod types;

pub use discovery::{discover, last_real_commit, parse_log_line};
pub use lifecycle::{create, switch_to};
pub use types::{Checkpoint, CheckpointList, CheckpointTag};
