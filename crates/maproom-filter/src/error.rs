//! Error types for maproom-filter

use maproom_core::CoreError;
use thiserror::Error;

/// Filter error type
#[derive(Error, Debug)]
pub enum FilterError {
    /// Interleaved buffer length does not match the declared dimensions
    #[error("buffer length mismatch: expected {expected}, got {actual}")]
    BufferLengthMismatch { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Core container error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for filter operations
pub type FilterResult<T> = std::result::Result<T, FilterError>;
