//! Error types for maproom-trace

use maproom_core::CoreError;
use thiserror::Error;

/// Trace error type
#[derive(Error, Debug)]
pub enum TraceError {
    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Pyramid has no levels
    #[error("empty cost pyramid")]
    EmptyPyramid,

    /// Core container error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for trace operations
pub type TraceResult<T> = std::result::Result<T, TraceError>;
