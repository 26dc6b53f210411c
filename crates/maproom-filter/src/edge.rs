//! The edge model
//!
//! An `EdgeMap` is the shared substrate for snapping, live-wire cost
//! fields and edge-aware region growing: grayscale input is box-blurred
//! once to tame sensor noise, then Sobel operators produce per-pixel
//! gradients and their magnitude.

use crate::blur::box_blur_3x3;
use crate::error::FilterResult;
use maproom_core::{FloatMap, GrayMap};

/// Gradient magnitude/direction map of an image
#[derive(Debug, Clone)]
pub struct EdgeMap {
    width: u32,
    height: u32,
    magnitudes: FloatMap,
    gradient_x: FloatMap,
    gradient_y: FloatMap,
    max_magnitude: f32,
}

impl EdgeMap {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn magnitudes(&self) -> &FloatMap {
        &self.magnitudes
    }

    #[inline]
    pub fn gradient_x(&self) -> &FloatMap {
        &self.gradient_x
    }

    #[inline]
    pub fn gradient_y(&self) -> &FloatMap {
        &self.gradient_y
    }

    /// Largest magnitude in the map (0.0 for a flat image)
    #[inline]
    pub fn max_magnitude(&self) -> f32 {
        self.max_magnitude
    }

    /// Magnitude at a pixel, or `None` out of bounds
    #[inline]
    pub fn magnitude_at(&self, x: u32, y: u32) -> Option<f32> {
        self.magnitudes.get(x, y)
    }
}

/// Build the edge map of a grayscale image
pub fn build_edge_map(gray: &GrayMap) -> FilterResult<EdgeMap> {
    let blurred = box_blur_3x3(gray);
    let w = blurred.width();
    let h = blurred.height();

    let mut gx = FloatMap::new(w, h)?;
    let mut gy = FloatMap::new(w, h)?;
    let mut mag = FloatMap::new(w, h)?;
    let mut max_magnitude = 0.0f32;

    let sample = |x: i32, y: i32| -> f32 {
        let sx = x.clamp(0, w as i32 - 1) as u32;
        let sy = y.clamp(0, h as i32 - 1) as u32;
        blurred.get_unchecked(sx, sy) as f32
    };

    for y in 0..h as i32 {
        for x in 0..w as i32 {
            // Sobel 3x3
            let tl = sample(x - 1, y - 1);
            let tc = sample(x, y - 1);
            let tr = sample(x + 1, y - 1);
            let ml = sample(x - 1, y);
            let mr = sample(x + 1, y);
            let bl = sample(x - 1, y + 1);
            let bc = sample(x, y + 1);
            let br = sample(x + 1, y + 1);

            let dx = (tr + 2.0 * mr + br) - (tl + 2.0 * ml + bl);
            let dy = (bl + 2.0 * bc + br) - (tl + 2.0 * tc + tr);
            let m = (dx * dx + dy * dy).sqrt();

            gx.set_unchecked(x as u32, y as u32, dx);
            gy.set_unchecked(x as u32, y as u32, dy);
            mag.set_unchecked(x as u32, y as u32, m);
            max_magnitude = max_magnitude.max(m);
        }
    }

    Ok(EdgeMap {
        width: w,
        height: h,
        magnitudes: mag,
        gradient_x: gx,
        gradient_y: gy,
        max_magnitude,
    })
}
