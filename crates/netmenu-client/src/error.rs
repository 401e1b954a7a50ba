// ── Client error type ──

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The caller lacks network-management privilege.
    #[error("not authorized to list network sites")]
    Authorization,

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered outside the protocol.
    #[error("server error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The body did not parse as the expected shape.
    #[error("malformed response: {message}")]
    Deserialization { message: String },

    /// Reading or writing the persisted index failed.
    #[error("index persistence failed: {0}")]
    Persistence(#[from] std::io::Error),
}
