//! Error types for scout.
//!
//! The cache surface can fail in exactly two ways: a construction-time
//! argument problem, or a required key that is absent or expired.

use thiserror::Error;

/// Result type alias using `ScoutError`.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Error type for all scout cache operations.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// A constructor argument was missing or unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested key is not present, or its entry has expired.
    #[error("Key not found: {0}")]
    KeyNotFound(String),
}

impl ScoutError {
    /// Returns true if this error reports a missing or expired key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScoutError::KeyNotFound(_))
    }
}
