//! maproom-segment - Region growing and interactive mask editing
//!
//! This crate provides the selection algorithms the tools drive:
//!
//! - **Smart wand** - perceptual-color flood fill with tolerance,
//!   falloff, multi-layer averaging and edge-aware entrance locking
//! - **Boundary refinement** - band-limited regrowth against an energy
//!   field
//! - **Brush** - disc stamps with hardness and pressure, interpolated
//!   strokes
//! - **Morphology** - interior fill, erode, budgeted dilate, feather
//!
//! # Examples
//!
//! ```
//! use maproom_segment::{WandOptions, magic_wand};
//!
//! // A 4x4 solid-color layer selects entirely
//! let rgba = vec![128u8; 4 * 4 * 4];
//! let result = magic_wand(&[&rgba], 4, 4, (1, 1), &WandOptions::default()).unwrap();
//! assert_eq!(result.accepted, 16);
//! ```

pub mod brush;
pub mod entrance;
pub mod error;
pub mod morph;
pub mod refine;
pub mod wand;

pub use brush::{BrushOptions, StrokePoint, paint_stroke, stamp_disc};
pub use entrance::{EntranceZone, POST_SNAP_RADIUS_SCALE, zone_containing, zone_near_contour};
pub use error::{SegmentError, SegmentResult};
pub use morph::{
    DILATE_WORLD_BUDGET, dilate_mask, dilation_radius_for, erode_mask, feather_mask,
    fill_mask_interior,
};
pub use refine::{RefineOptions, refine_boundary_to_edges};
pub use wand::{
    Connectivity, EdgeWandParams, WandOptions, WandResult, magic_wand, magic_wand_with_edges,
};
