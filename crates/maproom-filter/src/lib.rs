//! maproom-filter - Image preprocessing and the edge model
//!
//! This crate provides the pixel-level filters the segmentation stack
//! builds on:
//!
//! - **Grayscale** - BT.601 luma from interleaved RGBA
//! - **Blur** - 3x3 box blur and separable Gaussian (u8 and f32 grids)
//! - **Enhancement** - tile-based local contrast, normalization
//! - **Edge model** - Sobel gradient magnitude/direction maps
//! - **Color science** - sRGB -> CIE L*a*b* with perceptual distance

pub mod blur;
pub mod colorspace;
pub mod edge;
pub mod enhance;
pub mod error;
pub mod gray;

pub use blur::{box_blur_3x3, gaussian_blur, gaussian_blur_float};
pub use colorspace::{Lab, Xyz, rgb_to_lab, rgb_to_xyz, xyz_to_lab};
pub use edge::{EdgeMap, build_edge_map};
pub use enhance::{ContrastOptions, enhance_local_contrast, normalize};
pub use error::{FilterError, FilterResult};
pub use gray::{luma_from_rgba, rgb_to_gray};
