//! Pool error types.

use thiserror::Error;

use crate::game::entities::FaceKey;

/// Errors raised by the token and visual pools.
///
/// None of these interrupt reconciliation. Callers log them and carry on with
/// a degraded result.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum PoolError {
    /// No idle visual is left under the requested key.
    #[error("visual pool empty for key {key}: warm-up undersized or a visual leaked")]
    VisualExhausted { key: FaceKey },

    /// Every tile handle is already bound somewhere.
    #[error("token pool exhausted ({capacity} handles in use)")]
    TokensExhausted { capacity: usize },

    /// A visual id that the pool never issued.
    #[error("unknown visual {0}")]
    UnknownVisual(u32),

    /// A visual returned while it was already idle.
    #[error("visual {0} returned twice")]
    VisualAlreadyIdle(u32),
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
