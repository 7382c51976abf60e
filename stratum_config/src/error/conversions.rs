//! Trait-based conversions between external error types and `StratumError`.

use super::StratumError;

/// Serialization failures outside a file context become
/// [`StratumError::Serialize`].
impl From<serde_json::Error> for StratumError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}
