// ── Server error type ──

use thiserror::Error;

/// Errors surfaced by the server half.
///
/// Transient-store trouble is absent from most call paths:
/// [`crate::StampCache`] recovers from it internally by issuing uncached
/// stamps, so only the store implementations themselves return
/// [`ServerError::Store`].
#[derive(Debug, Error)]
pub enum ServerError {
    /// The tenant registry could not be queried.
    #[error("site registry unavailable: {message}")]
    Registry { message: String },

    /// The shared transient store could not be reached.
    #[error("transient store unavailable: {message}")]
    Store { message: String },

    /// Configuration could not be loaded or merged.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Seed or state file I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A seed file did not parse as a site list.
    #[error("malformed seed file: {0}")]
    Seed(#[from] serde_json::Error),
}
