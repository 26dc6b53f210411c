//! Grayscale conversion
//!
//! Converts interleaved RGBA sample buffers to 8-bit luma using ITU-R
//! BT.601 coefficients: `gray = 0.299*R + 0.587*G + 0.114*B`.

use crate::error::{FilterError, FilterResult};
use maproom_core::GrayMap;

/// Luma of one RGB triple
#[inline]
pub fn rgb_to_gray(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Convert an interleaved RGBA buffer to a grayscale grid
///
/// # Errors
///
/// Returns [`FilterError::BufferLengthMismatch`] if `rgba.len()` is not
/// `width * height * 4`.
pub fn luma_from_rgba(rgba: &[u8], width: u32, height: u32) -> FilterResult<GrayMap> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(FilterError::BufferLengthMismatch {
            expected,
            actual: rgba.len(),
        });
    }
    let mut gray = GrayMap::new(width, height)?;
    for (i, px) in rgba.chunks_exact(4).enumerate() {
        gray.data_mut()[i] = rgb_to_gray(px[0], px[1], px[2]);
    }
    Ok(gray)
}
