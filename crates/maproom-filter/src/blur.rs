//! Blur filters
//!
//! Replicate (clamp) border handling throughout: samples outside the
//! grid take the value of the nearest edge pixel, matching the rest of
//! the preprocessing pipeline.

use crate::error::{FilterError, FilterResult};
use maproom_core::{FloatMap, GrayMap};

/// 3x3 box blur of a grayscale grid
pub fn box_blur_3x3(src: &GrayMap) -> GrayMap {
    let w = src.width() as i32;
    let h = src.height() as i32;
    let mut out = GrayMap::new(src.width(), src.height()).expect("source already validated");

    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let sx = (x + dx).clamp(0, w - 1) as u32;
                    let sy = (y + dy).clamp(0, h - 1) as u32;
                    sum += src.get_unchecked(sx, sy) as u32;
                }
            }
            out.set_unchecked(x as u32, y as u32, (sum / 9) as u8);
        }
    }
    out
}

/// Build a normalized 1D Gaussian kernel for the given sigma
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as i32;
    let mut kernel = Vec::with_capacity((2 * radius + 1) as usize);
    let denom = 2.0 * sigma * sigma;
    let mut sum = 0.0;
    for i in -radius..=radius {
        let v = (-(i * i) as f32 / denom).exp();
        kernel.push(v);
        sum += v;
    }
    for v in kernel.iter_mut() {
        *v /= sum;
    }
    kernel
}

/// Separable Gaussian blur of a grayscale grid
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameter`] for a non-positive sigma.
pub fn gaussian_blur(src: &GrayMap, sigma: f32) -> FilterResult<GrayMap> {
    if !(sigma > 0.0) {
        return Err(FilterError::InvalidParameter(format!("sigma {sigma}")));
    }
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as i32;
    let w = src.width() as i32;
    let h = src.height() as i32;

    // Horizontal pass into a float scratch buffer
    let mut scratch = vec![0.0f32; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0;
            for (k, &kv) in kernel.iter().enumerate() {
                let sx = (x + k as i32 - radius).clamp(0, w - 1) as u32;
                sum += src.get_unchecked(sx, y as u32) as f32 * kv;
            }
            scratch[(y * w + x) as usize] = sum;
        }
    }

    // Vertical pass
    let mut out = GrayMap::new(src.width(), src.height())?;
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0;
            for (k, &kv) in kernel.iter().enumerate() {
                let sy = (y + k as i32 - radius).clamp(0, h - 1);
                sum += scratch[(sy * w + x) as usize] * kv;
            }
            out.set_unchecked(x as u32, y as u32, sum.round().clamp(0.0, 255.0) as u8);
        }
    }
    Ok(out)
}

/// Separable Gaussian blur of a float grid
pub fn gaussian_blur_float(src: &FloatMap, sigma: f32) -> FilterResult<FloatMap> {
    if !(sigma > 0.0) {
        return Err(FilterError::InvalidParameter(format!("sigma {sigma}")));
    }
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as i32;
    let w = src.width() as i32;
    let h = src.height() as i32;

    let mut scratch = vec![0.0f32; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0;
            for (k, &kv) in kernel.iter().enumerate() {
                let sx = (x + k as i32 - radius).clamp(0, w - 1) as u32;
                sum += src.get_unchecked(sx, y as u32) * kv;
            }
            scratch[(y * w + x) as usize] = sum;
        }
    }

    let mut out = FloatMap::new(src.width(), src.height())?;
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0;
            for (k, &kv) in kernel.iter().enumerate() {
                let sy = (y + k as i32 - radius).clamp(0, h - 1);
                sum += scratch[(sy * w + x) as usize] * kv;
            }
            out.set_unchecked(x as u32, y as u32, sum);
        }
    }
    Ok(out)
}
