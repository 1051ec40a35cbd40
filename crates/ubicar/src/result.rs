//! Result and error types for Ubicar.

use thiserror::Error;

/// Result type for Ubicar operations
pub type UbicarResult<T> = Result<T, UbicarError>;

/// Errors that can occur in Ubicar
#[derive(Debug, Error)]
pub enum UbicarError {
    /// Snapshot data does not describe a single rooted tree
    #[error("Malformed snapshot: {message}")]
    MalformedSnapshot {
        /// What exactly was wrong with the hierarchy data
        message: String,
    },

    /// The search space was exhausted (or the budget expired) before the
    /// target could be distinguished from every other node
    #[error("No unequivocal locator exists within the search limits")]
    LocatorUnsynthesizable,

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
