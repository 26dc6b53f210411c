//! Error types for maproom-vector

use maproom_core::CoreError;
use thiserror::Error;

/// Vector conversion error type
#[derive(Error, Debug)]
pub enum VectorError {
    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Core container error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for vector operations
pub type VectorResult<T> = std::result::Result<T, VectorError>;
