//! Error types for maproom-session

use maproom_core::CoreError;
use thiserror::Error;

/// Session error type
#[derive(Error, Debug)]
pub enum SessionError {
    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Segmentation failure
    #[error(transparent)]
    Segment(#[from] maproom_segment::SegmentError),

    /// Raster/vector conversion failure
    #[error(transparent)]
    Vector(#[from] maproom_vector::VectorError),

    /// Preprocessing failure
    #[error(transparent)]
    Filter(#[from] maproom_filter::FilterError),

    /// Cost/trace failure
    #[error(transparent)]
    Trace(#[from] maproom_trace::TraceError),

    /// Core container error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;
