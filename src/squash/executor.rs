//! Finalize: fold the checkpoint run into one commit and publish it
//!
//! Each step advances a `FinalizeState`. When a step fails, the rollback owed
//! by the state reached so far is applied before the error is surfaced:
//! - up to `PlanComputed` nothing has been touched
//! - after the backup exists, the branch is restored from it and it is deleted
//! - once the squash commit exists it is kept; only the backup is deleted

use chrono::Utc;
use serde::Serialize;
use shell_escape::escape;
use std::borrow::Cow;
use tracing::{debug, info, warn};

use super::planner::{self, SquashPlan};
use super::state::{FinalizeState, Rollback};
use crate::checkpoints::discover;
use crate::config::Settings;
use crate::diagnosis::{diagnose, Diagnosis, FailureKind};
use crate::error::{Error, Result};
use crate::git::{GitOutput, Store};

/// Result of a finalize run that got as far as committing, or found nothing to commit
#[derive(Debug, Clone, Serialize)]
pub struct FinalizeOutcome {
    pub state: FinalizeState,
    /// Branch the squash landed on and was pushed from
    pub branch: String,
    pub base: String,
    pub message: String,
    /// Number of checkpoints folded into the commit
    pub squashed: usize,
    /// Newer checkpoints dropped because finalize started further back
    pub abandoned: usize,
    pub final_commit: Option<String>,
    pub push_error: Option<String>,
    pub diagnosis: Option<Diagnosis>,
    /// Shell command that retries the push by hand
    pub recovery_command: Option<String>,
    pub trail: Vec<FinalizeState>,
}

impl FinalizeOutcome {
    /// True only when the commit was pushed and cleanup ran
    pub fn is_success(&self) -> bool {
        self.state == FinalizeState::CleanedUp
    }

    /// Turn a partial failure into `Error::PushFailed`; other outcomes pass through.
    pub fn into_result(self) -> Result<Self> {
        if self.state != FinalizeState::PartialFailure {
            return Ok(self);
        }
        Err(Error::PushFailed {
            commit: self.final_commit.unwrap_or_default(),
            message: self.push_error.unwrap_or_default(),
            diagnosis: self
                .diagnosis
                .unwrap_or_else(|| diagnose(FailureKind::Push, "", "")),
            recovery: self.recovery_command.unwrap_or_default(),
        })
    }
}

/// The manual push a user can run after a partial failure
pub fn recovery_command(remote: &str, branch: &str) -> String {
    format!(
        "git push --force-with-lease {} {}",
        escape(Cow::Borrowed(remote)),
        escape(Cow::Borrowed(branch))
    )
}

/// Drives one finalize run and records every state it passes through
pub struct Finalizer<'a> {
    store: &'a dyn Store,
    settings: &'a Settings,
    state: FinalizeState,
    trail: Vec<FinalizeState>,
    backup: Option<String>,
}

impl<'a> Finalizer<'a> {
    pub fn new(store: &'a dyn Store, settings: &'a Settings) -> Self {
        Self {
            store,
            settings,
            state: FinalizeState::Start,
            trail: vec![FinalizeState::Start],
            backup: None,
        }
    }

    pub fn state(&self) -> FinalizeState {
        self.state
    }

    pub fn trail(&self) -> &[FinalizeState] {
        &self.trail
    }

    /// Run finalize to a terminal state.
    ///
    /// Returns `Err` for every path that ends `Aborted`. `PartialFailure` and
    /// `NothingToCommit` are returned as outcomes.
    pub fn run(&mut self, custom_message: Option<&str>) -> Result<FinalizeOutcome> {
        if !self.store.is_repository() {
            return Err(self.abort(Error::NotARepository));
        }

        let branch = self.normalize_branch().map_err(|e| self.abort(e))?;
        let plan = self.compute_plan().map_err(|e| self.abort(e))?;
        self.back_up(&plan.current().id).map_err(|e| self.abort(e))?;
        self.reset(&plan.base).map_err(|e| self.abort(e))?;

        let message = self.commit_message(custom_message);
        let committed = self.commit(&message).map_err(|e| self.abort(e))?;

        let mut outcome = FinalizeOutcome {
            state: self.state,
            branch,
            base: plan.base.clone(),
            message,
            squashed: plan.run.len(),
            abandoned: plan.abandoned(),
            final_commit: None,
            push_error: None,
            diagnosis: None,
            recovery_command: None,
            trail: Vec::new(),
        };

        if !committed {
            self.drop_backup();
            self.advance(FinalizeState::NothingToCommit);
            info!(base = %plan.base, "squashed checkpoints match the base; nothing to commit");
            return Ok(self.finish(outcome));
        }
        outcome.final_commit = self.store.current_snapshot_id().ok();

        if let Some((output, diagnosis)) = self.push(&outcome.branch) {
            self.drop_backup();
            self.advance(FinalizeState::PartialFailure);
            warn!(
                branch = %outcome.branch,
                category = ?diagnosis.category,
                "push failed after commit; commit kept"
            );
            outcome.push_error = Some(output.message());
            outcome.diagnosis = Some(diagnosis);
            outcome.recovery_command = Some(recovery_command(&self.settings.remote, &outcome.branch));
            return Ok(self.finish(outcome));
        }

        self.clean_up();
        info!(
            branch = %outcome.branch,
            squashed = outcome.squashed,
            commit = outcome.final_commit.as_deref().unwrap_or("?"),
            "finalized"
        );
        Ok(self.finish(outcome))
    }

    fn advance(&mut self, next: FinalizeState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid finalize transition {} -> {next}",
            self.state
        );
        debug!(from = %self.state, to = %next, "finalize transition");
        self.state = next;
        self.trail.push(next);
    }

    fn finish(&self, mut outcome: FinalizeOutcome) -> FinalizeOutcome {
        outcome.state = self.state;
        outcome.trail = self.trail.clone();
        outcome
    }

    /// Apply the rollback owed by the current state, then mark the run aborted.
    fn abort(&mut self, err: Error) -> Error {
        match self.state.rollback() {
            Rollback::Nothing => {}
            Rollback::RestoreBackup => self.restore_backup(),
            Rollback::DropBackup => self.drop_backup(),
        }
        warn!(state = %self.state, error = %err, "finalize aborted");
        self.advance(FinalizeState::Aborted);
        err
    }

    fn restore_backup(&mut self) {
        let Some(backup) = self.backup.take() else {
            return;
        };
        if let Err(e) = self.store.restore_to(&backup) {
            // Leave the backup in place; it is the only way back.
            warn!(%backup, error = %e, "failed to restore from backup branch");
            return;
        }
        info!(%backup, "restored branch from backup");
        if let Err(e) = self.store.delete_branch_ref(&backup) {
            warn!(%backup, error = %e, "failed to delete backup branch");
        }
    }

    fn drop_backup(&mut self) {
        if let Some(backup) = self.backup.take() {
            if let Err(e) = self.store.delete_branch_ref(&backup) {
                warn!(%backup, error = %e, "failed to delete backup branch");
            }
        }
    }

    /// Step 1: leave a detached HEAD for the first primary branch that works
    fn normalize_branch(&mut self) -> Result<String> {
        let store = self.store;
        let settings = self.settings;

        if let Some(branch) = store.current_branch()? {
            self.advance(FinalizeState::BranchNormalized);
            return Ok(branch);
        }

        let mut failures = Vec::new();
        for name in &settings.primary_branches {
            if !store.branch_exists(name) {
                failures.push(format!("{name}: no such branch"));
                continue;
            }
            match store.checkout(name) {
                Ok(()) => {
                    info!(branch = %name, "left detached HEAD");
                    self.advance(FinalizeState::BranchNormalized);
                    return Ok(name.clone());
                }
                Err(e) => failures.push(format!("{name}: {e}")),
            }
        }

        Err(Error::DetachedHead {
            tried: settings.primary_branches.join(", "),
            message: failures.join("; "),
        })
    }

    /// Step 2
    fn compute_plan(&mut self) -> Result<SquashPlan> {
        let tag = self.settings.tag();
        let list = discover(self.store, &tag, &self.settings.last_commit_prefix)?;
        let current = self.store.current_snapshot_id()?;
        let plan = planner::plan(&list, &current, self.store, &tag)?;
        self.advance(FinalizeState::PlanComputed);
        Ok(plan)
    }

    /// Step 3
    fn back_up(&mut self, at: &str) -> Result<()> {
        let name = self.backup_name(Utc::now().timestamp());
        self.store
            .create_branch_ref(&name, at)
            .map_err(|e| Error::BackupFailed {
                name: name.clone(),
                message: e.to_string(),
            })?;
        info!(backup = %name, %at, "created backup branch");
        self.backup = Some(name);
        self.advance(FinalizeState::BackedUp);
        Ok(())
    }

    fn backup_name(&self, unix: i64) -> String {
        let stem = format!("{}-{unix}", self.settings.backup_prefix);
        if !self.store.branch_exists(&stem) {
            return stem;
        }
        (2u32..)
            .map(|n| format!("{stem}-{n}"))
            .find(|candidate| !self.store.branch_exists(candidate))
            .unwrap_or(stem)
    }

    /// Step 4
    fn reset(&mut self, base: &str) -> Result<()> {
        self.store
            .soft_reset_to(base)
            .map_err(|e| Error::ResetFailed {
                base: base.to_string(),
                message: e.to_string(),
            })?;
        self.advance(FinalizeState::Reset);
        Ok(())
    }

    fn commit_message(&self, custom: Option<&str>) -> String {
        match custom.map(str::trim).filter(|m| !m.is_empty()) {
            Some(message) => message.to_string(),
            None => format!("Update: {}", self.store.now()),
        }
    }

    /// Step 5. `Ok(false)` means the tree is identical to the base.
    fn commit(&mut self, message: &str) -> Result<bool> {
        if !self.store.has_staged_changes()? {
            if !self.store.working_tree_is_dirty()? {
                return Ok(false);
            }
            debug!("nothing staged after reset, staging working tree");
            self.store.stage_all()?;
        }

        let output = self.store.commit(message).unwrap_or_else(failed_output);
        if !output.success {
            return Err(Error::CommitFailed {
                message: output.message(),
                diagnosis: diagnose(FailureKind::Commit, &output.stdout, &output.stderr),
            });
        }
        self.advance(FinalizeState::Committed);
        Ok(true)
    }

    /// Step 6. Returns the failed output and its diagnosis when the push is refused.
    fn push(&mut self, branch: &str) -> Option<(GitOutput, Diagnosis)> {
        let output = self
            .store
            .push_with_conflict_check(&self.settings.remote, branch)
            .unwrap_or_else(failed_output);
        if output.success {
            self.advance(FinalizeState::Pushed);
            return None;
        }
        let diagnosis = diagnose(FailureKind::Push, &output.stdout, &output.stderr);
        Some((output, diagnosis))
    }

    /// Step 7. Only reached after a confirmed push.
    fn clean_up(&mut self) {
        self.drop_backup();
        if let Err(e) = self.store.expire_event_log_and_compact() {
            warn!(error = %e, "failed to purge event log after finalize");
        }
        self.advance(FinalizeState::CleanedUp);
    }
}

fn failed_output(err: crate::error::StoreError) -> GitOutput {
    GitOutput {
        stderr: err.to_string(),
        success: false,
        ..GitOutput::default()
    }
}

/// Squash the checkpoint run ending at HEAD, commit it and push it.
pub fn finalize(
    store: &dyn Store,
    settings: &Settings,
    custom_message: Option<&str>,
) -> Result<FinalizeOutcome> {
    Finalizer::new(store, settings).run(custom_message)
}
