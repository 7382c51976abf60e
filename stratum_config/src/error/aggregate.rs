//! Batches of save failures reported as one [`StratumError`].

use std::{fmt, slice, sync::Arc};

use super::StratumError;

/// Failures collected while writing several component files.
///
/// Each entry stays shared so a [`crate::SaveSummary`] can keep its own
/// copy of the same error.
///
/// ```
/// use stratum_config::StratumError;
///
/// let batch = StratumError::aggregate([
///     StratumError::invalid_binding("empty key"),
///     StratumError::invalid_path("ui..scale", "empty segment"),
/// ]);
/// let StratumError::Aggregate(failures) = batch else {
///     unreachable!("two errors always aggregate");
/// };
/// assert_eq!(failures.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors {
    errors: Vec<Arc<StratumError>>,
}

impl AggregatedErrors {
    /// Wraps `errors` in their original order.
    #[must_use]
    pub const fn new(errors: Vec<Arc<StratumError>>) -> Self {
        Self { errors }
    }

    /// Borrow the collected errors.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &StratumError> {
        self.errors.iter().map(AsRef::as_ref)
    }

    /// Number of collected errors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether the batch holds no errors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The shared handles in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Arc<StratumError>] {
        &self.errors
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        for error in &self.errors {
            write!(f, "{separator}  - {error}")?;
            separator = "\n";
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedErrors {}

impl<'a> IntoIterator for &'a AggregatedErrors {
    type Item = &'a Arc<StratumError>;
    type IntoIter = slice::Iter<'a, Arc<StratumError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoIterator for AggregatedErrors {
    type Item = Arc<StratumError>;
    type IntoIter = std::vec::IntoIter<Arc<StratumError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
