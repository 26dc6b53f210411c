//! maproom-trace - Cost pyramids, live-wire and snapping
//!
//! The interactive boundary helpers:
//!
//! - **Cost fields** - finite-difference gradient cost, edge-following
//!   inversion
//! - **Cost pyramid** - 2x box-downsampled multi-resolution stack
//! - **Live-wire** - coarse-to-fine Dijkstra with corridor restriction
//! - **Snapping** - vertex-normal search against a Sobel edge map
//! - **Smoothing** - iterative neighbor averaging
//!
//! # Examples
//!
//! ```
//! use maproom_core::FloatMap;
//! use maproom_trace::{LiveWireOptions, build_cost_pyramid, trace_live_wire};
//!
//! let cost = FloatMap::from_data(32, 32, vec![1.0; 1024]).unwrap();
//! let pyramid = build_cost_pyramid(&cost, 3).unwrap();
//! let path = trace_live_wire(&pyramid, (2, 2), (29, 20), &LiveWireOptions::default());
//! assert_eq!(path[0], (2, 2));
//! assert_eq!(*path.last().unwrap(), (29, 20));
//! ```

pub mod cost;
pub mod error;
pub mod livewire;
pub mod snap;

pub use cost::{
    CostLevel, CostPyramid, DEFAULT_PYRAMID_DEPTH, build_cost_pyramid, cost_field_from_gray,
    edge_following_cost,
};
pub use error::{TraceError, TraceResult};
pub use livewire::{LiveWireOptions, straight_line, trace_live_wire};
pub use snap::{SnapOptions, smooth_polygon, snap_polygon_to_edges};
