//! Maproom - Interactive region-masking and vectorization engine
//!
//! Maproom lets a user paint, lasso, or click-to-grow arbitrary
//! irregular room shapes on a raster map image, converts freely between
//! raster masks and vector boundaries, assists authoring with
//! color-based region growing and edge snapping, and persists masks in
//! a compact lossless byte format.
//!
//! # Overview
//!
//! - Mask container and lossless codec with embedded bounds metadata
//! - Scanline rasterization and marching-squares contour extraction
//! - Sobel edge model, cost pyramids and coarse-to-fine live-wire
//! - Perceptual-color region growing with entrance locking
//! - Brush, feather, dilate and boundary refinement
//! - Per-session selection store, ROI preprocessing cache and pointer
//!   tool state machines
//!
//! # Example
//!
//! ```
//! use maproom::{Bounds, RoomMask};
//! use maproom::codec::{decode_mask, encode_mask};
//!
//! let mut mask = RoomMask::new(16, 16, Bounds::full()).unwrap();
//! mask.set_unchecked(8, 8, 255);
//! let bytes = encode_mask(&mask);
//! let decoded = decode_mask(&bytes).unwrap();
//! assert_eq!(decoded, mask);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use maproom_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use maproom_codec as codec;
pub use maproom_filter as filter;
pub use maproom_segment as segment;
pub use maproom_session as session;
pub use maproom_trace as trace;
pub use maproom_vector as vector;
