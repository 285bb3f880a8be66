//! Checkpoint entries and the ordered list discovery produces

use serde::Serialize;

/// Marker text that identifies checkpoint commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointTag(String);

impl CheckpointTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if a commit subject carries the tag anywhere
    pub fn matches(&self, text: &str) -> bool {
        text.contains(&self.0)
    }

    /// Commit message for a new checkpoint: `<tag> <timestamp>[ - <note>]`
    pub fn message(&self, timestamp: &str, note: Option<&str>) -> String {
        match note.map(str::trim).filter(|n| !n.is_empty()) {
            Some(note) => format!("{} {timestamp} - {note}", self.0),
            None => format!("{} {timestamp}", self.0),
        }
    }
}

impl Default for CheckpointTag {
    fn default() -> Self {
        Self::new("CHECKPOINT:")
    }
}

/// A reference to one historical snapshot.
///
/// Identity is the id: two values with the same id name the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    /// Short commit id
    pub id: String,
    /// Commit subject (prefixed for display when this is the sentinel)
    pub summary: String,
    pub is_checkpoint: bool,
    /// The synthetic "last real commit" entry appended by discovery
    pub is_sentinel: bool,
}

impl Checkpoint {
    pub fn tagged(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            is_checkpoint: true,
            is_sentinel: false,
        }
    }

    /// A plain commit without the checkpoint tag
    pub fn untagged(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            is_checkpoint: false,
            is_sentinel: false,
        }
    }

    pub fn sentinel(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            is_checkpoint: false,
            is_sentinel: true,
        }
    }
}

/// Checkpoints newest first, unique by id, with at most one trailing sentinel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CheckpointList {
    entries: Vec<Checkpoint>,
}

impl CheckpointList {
    /// Build a list from tagged entries (newest first) and an optional sentinel.
    ///
    /// Entries repeating an earlier id are dropped, and the sentinel is dropped
    /// when its id is already present.
    pub fn new(tagged: Vec<Checkpoint>, sentinel: Option<Checkpoint>) -> Self {
        let mut entries: Vec<Checkpoint> = Vec::with_capacity(tagged.len() + 1);
        for entry in tagged {
            if !entries.iter().any(|e| e.id == entry.id) {
                entries.push(entry);
            }
        }
        if let Some(sentinel) = sentinel {
            if !entries.iter().any(|e| e.id == sentinel.id) {
                entries.push(sentinel);
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[Checkpoint] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Checkpoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.entries.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Number of tagged entries; the sentinel never counts
    pub fn checkpoint_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_checkpoint).count()
    }

    /// True if at least one real checkpoint exists.
    ///
    /// A list holding only the sentinel is non-empty but has no checkpoints.
    pub fn has_checkpoints(&self) -> bool {
        self.checkpoint_count() > 0
    }

    pub fn sentinel(&self) -> Option<&Checkpoint> {
        self.entries.last().filter(|e| e.is_sentinel)
    }
}

impl<'a> IntoIterator for &'a CheckpointList {
    type Item = &'a Checkpoint;
    type IntoIter = std::slice::Iter<'a, Checkpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
