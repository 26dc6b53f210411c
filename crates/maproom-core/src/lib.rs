//! maproom-core - Primitive containers for the maproom engine
//!
//! This crate provides the shared value types the rest of the workspace
//! builds on:
//!
//! - **Geometry** - normalized points and validated bounding rectangles
//! - **Masks** - `RoomMask`, the coverage grid for one room shape
//! - **Grids** - `GrayMap` (u8) and `FloatMap` (f32) working buffers
//!
//! # Examples
//!
//! ```
//! use maproom_core::{Bounds, RoomMask};
//!
//! let bounds = Bounds::new(0.1, 0.1, 0.6, 0.6).unwrap();
//! let mut mask = RoomMask::new(64, 64, bounds).unwrap();
//! mask.set_unchecked(10, 10, 255);
//! assert_eq!(mask.coverage_count(), 1);
//! ```

pub mod error;
pub mod geometry;
pub mod grid;
pub mod mask;

pub use error::{CoreError, CoreResult};
pub use geometry::{Bounds, Point};
pub use grid::{FloatMap, GrayMap};
pub use mask::RoomMask;
