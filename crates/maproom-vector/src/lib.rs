//! maproom-vector - Raster/vector conversion
//!
//! This crate converts between the two representations of a room shape:
//!
//! - **Rasterization** - even-odd scanline fill of world-space polygons
//! - **Contour extraction** - marching squares + loop stitching +
//!   Douglas-Peucker simplification
//! - **Measurement** - area, centroid, perimeter
//! - **Distance fields** - two-pass chamfer signed distance transform
//!
//! # Examples
//!
//! ```
//! use maproom_core::{Bounds, Point};
//! use maproom_vector::{extract_polygon, rasterize_polygon};
//!
//! let square = [
//!     Point::new(0.25, 0.25),
//!     Point::new(0.75, 0.25),
//!     Point::new(0.75, 0.75),
//!     Point::new(0.25, 0.75),
//! ];
//! let mask = rasterize_polygon(&square, 100, 100, Bounds::full()).unwrap();
//! let polygon = extract_polygon(&mask);
//! assert!(polygon.len() >= 4);
//! ```

pub mod contour;
pub mod error;
pub mod measure;
pub mod rasterize;
pub mod sdf;
pub mod simplify;

pub use contour::{ExtractOptions, extract_polygon, extract_polygon_with, signed_area};
pub use error::{VectorError, VectorResult};
pub use measure::{polygon_area, polygon_centroid, polygon_perimeter};
pub use rasterize::{fill_polygon, rasterize_polygon};
pub use sdf::{SignedDistanceField, distance_field};
pub use simplify::{dedupe_points, douglas_peucker, douglas_peucker_open, point_segment_distance};
