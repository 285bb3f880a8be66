//! One logical session over a repository
//!
//! `Session` is the surface the CLI talks to. It owns the store and settings
//! and marks mutating operations as in flight so background status polling
//! can stay out of their way.

pub mod poller;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use crate::checkpoints::{self, Checkpoint, CheckpointList};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::git::{GitStore, Store};
use crate::squash::{self, FinalizeOutcome, FinalizePreview};

pub use poller::{Affordances, StatusPoller};

pub struct Session<S: Store = GitStore> {
    store: S,
    settings: Settings,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the operation ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Session<GitStore> {
    /// Open the repository containing `dir` with settings resolved for it.
    pub fn open(dir: &Path) -> Result<Self> {
        let probe = Settings::default();
        let root = GitStore::toplevel(dir, probe.command_timeout()).ok_or(Error::NotARepository)?;
        let settings = Settings::load(&root)?;
        debug!(root = %root.display(), "opened repository");
        let store = GitStore::new(root, &settings);
        Ok(Self::new(store, settings))
    }
}

impl<S: Store> Session<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self {
            store,
            settings,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// True while a mutating operation is running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn begin(&self) -> InFlight<'_> {
        self.in_flight.store(true, Ordering::SeqCst);
        InFlight(&self.in_flight)
    }

    pub fn create_checkpoint(&self, note: Option<&str>) -> Result<Checkpoint> {
        let _guard = self.begin();
        checkpoints::create(&self.store, &self.settings.tag(), note)
    }

    pub fn list_checkpoints(&self) -> Result<CheckpointList> {
        if !self.store.is_repository() {
            return Err(Error::NotARepository);
        }
        checkpoints::discover(
            &self.store,
            &self.settings.tag(),
            &self.settings.last_commit_prefix,
        )
    }

    pub fn switch_to_checkpoint(&self, id: &str) -> Result<()> {
        let _guard = self.begin();
        checkpoints::switch_to(&self.store, id)
    }

    pub fn finalize(&self, custom_message: Option<&str>) -> Result<FinalizeOutcome> {
        let _guard = self.begin();
        squash::finalize(&self.store, &self.settings, custom_message)
    }

    pub fn preview(&self) -> Result<FinalizePreview> {
        squash::preview(&self.store, &self.settings)
    }

    /// False when the list cannot be read
    pub fn has_checkpoints(&self) -> bool {
        self.list_checkpoints()
            .map(|list| list.has_checkpoints())
            .unwrap_or(false)
    }

    /// False when the status cannot be read
    pub fn has_pending_changes(&self) -> bool {
        self.store.working_tree_is_dirty().unwrap_or(false)
    }

    pub fn current_id(&self) -> Option<String> {
        self.store.current_snapshot_id().ok()
    }

    pub fn current_branch(&self) -> Option<String> {
        self.store.current_branch().ok().flatten()
    }

    pub fn affordances(&self) -> Affordances {
        Affordances::compute(self.has_pending_changes(), self.has_checkpoints())
    }
}
