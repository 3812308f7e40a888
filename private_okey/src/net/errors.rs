//! Frame decoding error types.

use thiserror::Error;

/// Errors raised while turning a text frame into a typed message.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The frame is not valid JSON, or its envelope is malformed
    #[error("Failed to decode frame: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope's payload is absent or not an object
    #[error("Frame {0} has no payload object")]
    MissingPayload(String),

    /// A specific frame type was expected but another one arrived
    #[error("Unexpected frame type: {0}")]
    UnexpectedType(String),
}

/// Result type for frame decoding
pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;
