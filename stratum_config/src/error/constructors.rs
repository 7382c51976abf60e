//! Shorthand builders for [`StratumError`] values.

use std::sync::Arc;

use camino::Utf8Path;

use super::{AggregatedErrors, StratumError};

impl StratumError {
    /// Folds a batch of errors into one value.
    ///
    /// An empty batch yields `None`. A single error is returned as-is when
    /// nothing else holds its [`Arc`]; otherwise every error, even a lone
    /// shared one, lands in [`Self::Aggregate`].
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut batch: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        match batch.len() {
            0 => None,
            1 => batch.pop().map(|only| {
                Arc::try_unwrap(only).unwrap_or_else(|shared| Self::batch(vec![shared]))
            }),
            _ => Some(Self::batch(batch)),
        }
    }

    /// Like [`Self::try_aggregate`] for batches known to be non-empty.
    ///
    /// # Panics
    ///
    /// Panics when `errors` yields nothing.
    #[must_use]
    #[track_caller]
    pub fn aggregate<I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let Some(error) = Self::try_aggregate(errors) else {
            panic!("cannot aggregate an empty error batch");
        };
        error
    }

    fn batch(errors: Vec<Arc<Self>>) -> Self {
        Self::Aggregate(Box::new(AggregatedErrors::new(errors)))
    }

    /// I/O failure on the file at `path`.
    #[must_use]
    pub fn file(path: &Utf8Path, source: std::io::Error) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `path` exists but does not hold valid JSON.
    #[must_use]
    pub fn parse(path: &Utf8Path, source: serde_json::Error) -> Arc<Self> {
        Arc::new(Self::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rejected configuration path text.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum_config::StratumError;
    /// let e = StratumError::invalid_path("keybinds.", "empty segment");
    /// assert!(matches!(&*e, StratumError::InvalidPath { .. }));
    /// ```
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        })
    }

    /// Binding entry that names no usable input.
    #[must_use]
    pub fn invalid_binding(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::InvalidBinding {
            message: message.into(),
        })
    }
}
