//! Error types produced by the configuration engine's fallible helpers.
//!
//! Public engine operations never return these errors directly. File
//! loading, path parsing and binding parsing surface them internally so the
//! engine can translate each failure into an [`crate::InitializationReport`]
//! issue or a log statement.

mod aggregate;
mod constructors;
mod conversions;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::StratumError;
