//! Error types for maproom-segment

use maproom_core::CoreError;
use thiserror::Error;

/// Segmentation error type
#[derive(Error, Debug)]
pub enum SegmentError {
    /// Interleaved buffer length does not match the declared dimensions
    #[error("layer buffer length mismatch: expected {expected}, got {actual}")]
    LayerLengthMismatch { expected: usize, actual: usize },

    /// No sample layers were provided
    #[error("no layers")]
    NoLayers,

    /// Seed coordinate outside the sampled region
    #[error("invalid seed: ({x},{y})")]
    InvalidSeed { x: u32, y: u32 },

    /// Energy/edge field does not match the mask dimensions
    #[error("field size mismatch: {0}x{1} vs {2}x{3}")]
    FieldSizeMismatch(u32, u32, u32, u32),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Filter error from the preprocessing stack
    #[error(transparent)]
    Filter(#[from] maproom_filter::FilterError),

    /// Vector error from mask geometry helpers
    #[error(transparent)]
    Vector(#[from] maproom_vector::VectorError),

    /// Core container error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for segmentation operations
pub type SegmentResult<T> = std::result::Result<T, SegmentError>;
