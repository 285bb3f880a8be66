//! Error types for checkpoint and finalize operations
//!
//! `StoreError` describes a failed conversation with the git binary.
//! `Error` is the taxonomy surfaced to callers of the library.

use thiserror::Error;

use crate::diagnosis::Diagnosis;

/// A git invocation that could not produce a usable answer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to execute git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("git {command} timed out after {secs}s (timeout)")]
    Timeout { command: String, secs: u64 },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("not in a git repository")]
    NotARepository,

    #[error("git store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("no changes to checkpoint")]
    NothingToCheckpoint,

    #[error("you are already on checkpoint {0}")]
    AlreadyAtTarget(String),

    #[error("failed to switch to checkpoint {id}: {message}")]
    CheckoutFailed { id: String, message: String },

    #[error("current commit {0} is not a checkpoint; finalize only works from checkpoints")]
    NotAtCheckpoint(String),

    #[error("cannot find base commit for squashing: all commits appear to be checkpoints")]
    NoBaseFound,

    #[error(
        "in detached HEAD state and cannot switch to any of [{tried}]; checkout a branch first: {message}"
    )]
    DetachedHead { tried: String, message: String },

    #[error("failed to create backup branch {name}: {message}")]
    BackupFailed { name: String, message: String },

    #[error("failed to reset to base {base}: {message}")]
    ResetFailed { base: String, message: String },

    #[error("failed to create commit:\n{message}\n\nDiagnosis: {diagnosis}")]
    CommitFailed {
        message: String,
        diagnosis: Diagnosis,
    },

    #[error(
        "commit {commit} created successfully but push failed:\n{message}\n\nDiagnosis: {diagnosis}\n\nYou can push manually with:\n{recovery}"
    )]
    PushFailed {
        commit: String,
        message: String,
        diagnosis: Diagnosis,
        recovery: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Unknown(String),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
