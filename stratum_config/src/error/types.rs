//! Primary error enum for engine helpers.

use camino::Utf8PathBuf;
use thiserror::Error;

use super::aggregate::AggregatedErrors;

/// Errors raised while loading, parsing or persisting configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StratumError {
    /// I/O failure touching a user configuration file.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A user configuration file exists but is not valid JSON.
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        /// Path of the unparsable file.
        path: Utf8PathBuf,
        /// Parser error reported by `serde_json`.
        #[source]
        source: serde_json::Error,
    },

    /// A configuration path string does not follow the addressing grammar.
    #[error("Invalid configuration path '{path}': {reason}")]
    InvalidPath {
        /// The rejected path text.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// A system name that the engine does not know.
    #[error("Unknown configuration system '{0}'")]
    UnknownSystem(String),

    /// A binding entry that does not describe a valid physical input.
    #[error("Invalid binding: {message}")]
    InvalidBinding {
        /// Description of the problem.
        message: String,
    },

    /// Serializing a document for persistence failed.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Multiple errors occurred while processing a batch.
    #[error("multiple configuration errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
