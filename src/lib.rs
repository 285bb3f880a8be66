pub mod checkpoints;
pub mod commands;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod git;
pub mod logging;
pub mod session;
pub mod squash;

pub use error::{Error, Result};
