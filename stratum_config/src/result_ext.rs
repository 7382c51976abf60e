//! Extensions for mapping errors to `StratumResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(e.into()))`
//! patterns when converting external error types into the crate's
//! `StratumResult<T>` alias (`Result<T, Arc<StratumError>>`).
//!
//! # Examples
//!
//! ```
//! use stratum_config::{StratumResult, StratumResultExt};
//!
//! fn serialize() -> StratumResult<serde_json::Value> {
//!     serde_json::to_value(&42).into_stratum()
//! }
//! # assert!(serialize().is_ok());
//! ```

use crate::{StratumError, StratumResult};
use std::sync::Arc;

/// Generic extension for mapping any `Result<T, E>` with
/// `E: Into<StratumError>` into a `StratumResult<T>`.
pub trait StratumResultExt<T, E> {
    /// Convert `Result<T, E>` into `StratumResult<T>` using `Into<StratumError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<StratumError>`.
    fn into_stratum(self) -> StratumResult<T>;
}

impl<T, E> StratumResultExt<T, E> for Result<T, E>
where
    E: Into<StratumError>,
{
    fn into_stratum(self) -> StratumResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
