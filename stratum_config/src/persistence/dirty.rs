//! Stale-file bookkeeping and save results.

use std::collections::BTreeSet;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::StratumError;

/// Components whose user file is stale, and files that failed to parse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirtyTracker {
    dirty: BTreeSet<String>,
    corrupted: BTreeSet<Utf8PathBuf>,
}

impl DirtyTracker {
    /// An empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `component` stale. Returns `true` when it was clean.
    pub fn mark(&mut self, component: &str) -> bool {
        self.dirty.insert(component.to_owned())
    }

    /// `true` when `component` is stale.
    #[must_use]
    pub fn is_dirty(&self, component: &str) -> bool {
        self.dirty.contains(component)
    }

    /// Stale components in name order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Forgets `component`, e.g. after it is unregistered.
    pub fn forget(&mut self, component: &str) {
        self.dirty.remove(component);
    }

    /// Empties the dirty set.
    pub fn clear(&mut self) {
        self.dirty.clear();
    }

    /// Records `path` as unparsable.
    pub fn mark_corrupted(&mut self, path: &Utf8Path) {
        self.corrupted.insert(path.to_path_buf());
    }

    /// `true` when `path` failed to parse at its last load.
    #[must_use]
    pub fn is_corrupted(&self, path: &Utf8Path) -> bool {
        self.corrupted.contains(path)
    }

    /// Clears the corrupted mark once `path` has been rewritten.
    pub fn clear_corrupted(&mut self, path: &Utf8Path) {
        self.corrupted.remove(path);
    }

    /// Forgets every corrupted mark before files are reloaded.
    pub fn reset_corrupted(&mut self) {
        self.corrupted.clear();
    }

    /// Unparsable paths in order.
    pub fn corrupted(&self) -> impl Iterator<Item = &Utf8Path> {
        self.corrupted.iter().map(Utf8PathBuf::as_path)
    }

    /// Number of stale components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    /// `true` when nothing is stale.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }
}

/// A component whose document could not be written.
#[derive(Clone, Debug)]
pub struct SaveFailure {
    /// Component name.
    pub component: String,
    /// Why the write failed.
    pub error: Arc<StratumError>,
}

/// Outcome of a save batch.
#[derive(Clone, Debug, Default)]
pub struct SaveSummary {
    /// Components whose documents were written, in order.
    pub saved: Vec<String>,
    /// Components whose documents could not be written.
    pub failures: Vec<SaveFailure>,
}

impl SaveSummary {
    /// `true` when every write succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Folds every failure into one error.
    ///
    /// Returns `None` when the batch succeeded and
    /// [`StratumError::Aggregate`] listing every failure otherwise.
    #[must_use]
    pub fn error(&self) -> Option<StratumError> {
        StratumError::try_aggregate(self.failures.iter().map(|failure| failure.error.clone()))
    }
}
