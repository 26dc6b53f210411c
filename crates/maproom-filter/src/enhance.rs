//! Local contrast enhancement and normalization
//!
//! The contrast step is tile-based in the CLAHE family: each tile gets a
//! clipped percentile stretch, and every pixel blends the mappings of
//! its four surrounding tile centers bilinearly so tile seams never show.

use crate::error::{FilterError, FilterResult};
use maproom_core::{FloatMap, GrayMap};

/// Options for tile-based contrast enhancement
#[derive(Debug, Clone)]
pub struct ContrastOptions {
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Percentile clipped from each end of a tile histogram (0.0 - 0.2)
    pub clip_fraction: f32,
    /// Blend between identity (0.0) and the full stretch (1.0)
    pub strength: f32,
}

impl Default for ContrastOptions {
    fn default() -> Self {
        Self {
            tile_size: 64,
            clip_fraction: 0.05,
            strength: 0.8,
        }
    }
}

impl ContrastOptions {
    /// Set the tile edge length
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size.max(8);
        self
    }

    /// Set the enhancement strength
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength.clamp(0.0, 1.0);
        self
    }
}

/// Per-tile linear stretch derived from clipped percentiles
#[derive(Clone, Copy)]
struct TileMap {
    low: f32,
    high: f32,
}

impl TileMap {
    fn apply(&self, v: f32) -> f32 {
        if self.high - self.low < 1.0 {
            return v;
        }
        ((v - self.low) / (self.high - self.low) * 255.0).clamp(0.0, 255.0)
    }
}

/// Tile-based local contrast enhancement
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameter`] for a zero tile size.
pub fn enhance_local_contrast(src: &GrayMap, options: &ContrastOptions) -> FilterResult<GrayMap> {
    if options.tile_size == 0 {
        return Err(FilterError::InvalidParameter("tile_size 0".into()));
    }
    let w = src.width();
    let h = src.height();
    let tile = options.tile_size;
    let tiles_x = w.div_ceil(tile).max(1);
    let tiles_y = h.div_ceil(tile).max(1);

    // Build one clipped-percentile mapping per tile
    let mut maps = Vec::with_capacity((tiles_x * tiles_y) as usize);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile;
            let y0 = ty * tile;
            let x1 = (x0 + tile).min(w);
            let y1 = (y0 + tile).min(h);

            let mut histogram = [0u32; 256];
            let mut count = 0u32;
            for y in y0..y1 {
                for x in x0..x1 {
                    histogram[src.get_unchecked(x, y) as usize] += 1;
                    count += 1;
                }
            }
            let clip = (count as f32 * options.clip_fraction) as u32;
            let mut low = 0usize;
            let mut acc = 0u32;
            while low < 255 && acc + histogram[low] <= clip {
                acc += histogram[low];
                low += 1;
            }
            let mut high = 255usize;
            acc = 0;
            while high > low && acc + histogram[high] <= clip {
                acc += histogram[high];
                high -= 1;
            }
            maps.push(TileMap {
                low: low as f32,
                high: high as f32,
            });
        }
    }

    let tile_map = |tx: u32, ty: u32| maps[(ty * tiles_x + tx) as usize];

    // Bilinear blend of the four surrounding tile-center mappings
    let mut out = GrayMap::new(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let v = src.get_unchecked(x, y) as f32;

            let fx = (x as f32 - tile as f32 / 2.0) / tile as f32;
            let fy = (y as f32 - tile as f32 / 2.0) / tile as f32;
            let tx0 = fx.floor().max(0.0) as u32;
            let ty0 = fy.floor().max(0.0) as u32;
            let tx0 = tx0.min(tiles_x - 1);
            let ty0 = ty0.min(tiles_y - 1);
            let tx1 = (tx0 + 1).min(tiles_x - 1);
            let ty1 = (ty0 + 1).min(tiles_y - 1);
            let wx = (fx - tx0 as f32).clamp(0.0, 1.0);
            let wy = (fy - ty0 as f32).clamp(0.0, 1.0);

            let top = tile_map(tx0, ty0).apply(v) * (1.0 - wx) + tile_map(tx1, ty0).apply(v) * wx;
            let bottom =
                tile_map(tx0, ty1).apply(v) * (1.0 - wx) + tile_map(tx1, ty1).apply(v) * wx;
            let stretched = top * (1.0 - wy) + bottom * wy;

            let blended = v + (stretched - v) * options.strength;
            out.set_unchecked(x, y, blended.round().clamp(0.0, 255.0) as u8);
        }
    }
    Ok(out)
}

/// Scale a float grid so its maximum becomes 1.0
///
/// An all-zero grid stays all-zero.
pub fn normalize(src: &FloatMap) -> FloatMap {
    let max = src.max_value();
    if max <= 0.0 {
        return src.clone();
    }
    let mut out = src.clone();
    for v in out.data_mut() {
        *v /= max;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_stretches_flat_ramp() {
        // A narrow ramp (100..130) should widen
        let mut g = GrayMap::new(64, 64).unwrap();
        for y in 0..64u32 {
            for x in 0..64u32 {
                g.set_unchecked(x, y, (100 + (x * 30) / 64) as u8);
            }
        }
        let out = enhance_local_contrast(&g, &ContrastOptions::default()).unwrap();
        let in_range = |g: &GrayMap| {
            let min = *g.data().iter().min().unwrap() as i32;
            let max = *g.data().iter().max().unwrap() as i32;
            max - min
        };
        assert!(in_range(&out) > in_range(&g), "range did not widen");
    }

    #[test]
    fn test_contrast_uniform_untouched() {
        let mut g = GrayMap::new(32, 32).unwrap();
        g.data_mut().fill(77);
        let out = enhance_local_contrast(&g, &ContrastOptions::default()).unwrap();
        assert!(out.data().iter().all(|&v| v == 77));
    }

    #[test]
    fn test_normalize() {
        let f = FloatMap::from_data(2, 2, vec![0.0, 1.0, 2.0, 4.0]).unwrap();
        let n = normalize(&f);
        assert_eq!(n.data(), &[0.0, 0.25, 0.5, 1.0]);
        let z = FloatMap::new(2, 2).unwrap();
        assert_eq!(normalize(&z).data(), &[0.0; 4]);
    }
}
