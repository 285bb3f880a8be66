//! Classification of raw git failure text into actionable categories.
//!
//! Diagnosis is advisory: it decorates an error message with remediation
//! steps and never changes what the finalize executor does next.

pub mod guidance;

use serde::Serialize;
use std::fmt;

pub use guidance::remediation;

/// Which git operation produced the failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    Push,
    Commit,
}

/// Failure categories, in the order they are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Push used a ref that is not a branch (usually detached HEAD)
    RefName,
    Authentication,
    RemoteNotFound,
    /// Remote moved since it was last observed
    Rejected,
    NetworkOrTimeout,
    HookFailed,
    LockOrPermission,
    PathMismatch,
    NothingToCommit,
    Unknown,
}

/// A classified failure: the operation plus the category it matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    pub kind: FailureKind,
    pub category: Category,
}

impl Diagnosis {
    /// Fixed remediation text for this diagnosis
    pub fn remediation(&self) -> &'static str {
        remediation(self.kind, self.category)
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.remediation())
    }
}

type Rule = (Category, &'static [&'static str]);

const PUSH_RULES: &[Rule] = &[
    (Category::RefName, &["not a full refname", "refs/heads"]),
    (
        Category::Authentication,
        &["permission denied", "authentication", "could not read username"],
    ),
    (
        Category::RemoteNotFound,
        &["no such remote", "does not exist", "does not appear to be a git repository"],
    ),
    (
        Category::Rejected,
        &["rejected", "non-fast-forward", "stale info"],
    ),
    (
        Category::NetworkOrTimeout,
        &["network", "timeout", "timed out", "could not resolve host"],
    ),
];

const COMMIT_RULES: &[Rule] = &[
    (Category::NothingToCommit, &["nothing to commit", "no changes"]),
    (Category::HookFailed, &["pre-commit", "hook"]),
    (
        Category::LockOrPermission,
        &["index.lock", "unable to create", "permission denied"],
    ),
    (Category::PathMismatch, &["pathspec", "did not match"]),
    (Category::NetworkOrTimeout, &["timeout", "timed out"]),
];

/// Classify the output and error text of a failed git operation.
///
/// Matching is case-insensitive over `output` and `error` joined by a space;
/// the first matching rule for `kind` wins.
pub fn diagnose(kind: FailureKind, output: &str, error: &str) -> Diagnosis {
    let text = format!("{output} {error}").to_lowercase();
    let rules = match kind {
        FailureKind::Push => PUSH_RULES,
        FailureKind::Commit => COMMIT_RULES,
    };

    let category = rules
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| text.contains(needle)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Unknown);

    Diagnosis { kind, category }
}
