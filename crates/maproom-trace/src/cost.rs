//! Cost fields and the multi-resolution pyramid
//!
//! The live-wire searches a cost grid where cheap cells are the places a
//! boundary wants to run. Each pyramid level is a 2x2 box-downsample of
//! the previous one with its scale doubled, so a coarse search is cheap
//! and a fine search can stay inside a corridor.

use crate::error::{TraceError, TraceResult};
use maproom_core::{FloatMap, GrayMap};
use maproom_filter::gaussian_blur_float;

/// One pyramid level
#[derive(Debug, Clone)]
pub struct CostLevel {
    width: u32,
    height: u32,
    data: FloatMap,
    /// Finest-level pixels per cell edge at this level
    scale: u32,
}

impl CostLevel {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &FloatMap {
        &self.data
    }

    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }
}

/// Ordered stack of cost grids, finest first
#[derive(Debug, Clone)]
pub struct CostPyramid {
    levels: Vec<CostLevel>,
}

impl CostPyramid {
    #[inline]
    pub fn levels(&self) -> &[CostLevel] {
        &self.levels
    }

    #[inline]
    pub fn finest(&self) -> &CostLevel {
        &self.levels[0]
    }

    #[inline]
    pub fn coarsest(&self) -> &CostLevel {
        self.levels.last().expect("pyramid always has a level")
    }
}

/// Default pyramid depth
pub const DEFAULT_PYRAMID_DEPTH: u32 = 4;

/// Coarsest level keeps at least this many cells on its short side
const MIN_COARSE_SIDE: u32 = 8;

/// Local gradient magnitude of a grayscale image by finite differences
///
/// Forward differences with a clamped border; cheap on purpose, the
/// Sobel edge map is the heavyweight variant for snapping.
pub fn cost_field_from_gray(gray: &GrayMap, smooth_sigma: Option<f32>) -> TraceResult<FloatMap> {
    let w = gray.width();
    let h = gray.height();
    let mut field = FloatMap::new(w, h)?;

    for y in 0..h {
        for x in 0..w {
            let v = gray.get_unchecked(x, y) as f32;
            let right = gray.get_unchecked((x + 1).min(w - 1), y) as f32;
            let down = gray.get_unchecked(x, (y + 1).min(h - 1)) as f32;
            let dx = right - v;
            let dy = down - v;
            field.set_unchecked(x, y, (dx * dx + dy * dy).sqrt());
        }
    }

    match smooth_sigma {
        Some(sigma) if sigma > 0.0 => Ok(gaussian_blur_float(&field, sigma)
            .map_err(|e| TraceError::InvalidParameter(e.to_string()))?),
        _ => Ok(field),
    }
}

/// Turn an edge-magnitude field into an edge-following cost field
///
/// Strong edges become cheap cells so a shortest path hugs them. The
/// floor keeps every step strictly positive.
pub fn edge_following_cost(magnitude: &FloatMap) -> FloatMap {
    let max = magnitude.max_value();
    let mut out = magnitude.clone();
    if max <= 0.0 {
        for v in out.data_mut() {
            *v = 1.0;
        }
        return out;
    }
    for v in out.data_mut() {
        *v = 1.0 - (*v / max) * 0.95;
    }
    out
}

/// Build a multi-resolution cost pyramid
///
/// `depth` levels at most; the pyramid stops early once another halving
/// would drop the short side below 8 cells.
///
/// # Errors
///
/// Returns [`TraceError::InvalidParameter`] for a zero depth.
pub fn build_cost_pyramid(base: &FloatMap, depth: u32) -> TraceResult<CostPyramid> {
    if depth == 0 {
        return Err(TraceError::InvalidParameter("depth 0".into()));
    }

    let mut levels = vec![CostLevel {
        width: base.width(),
        height: base.height(),
        data: base.clone(),
        scale: 1,
    }];

    while (levels.len() as u32) < depth {
        let prev = levels.last().expect("at least the base level");
        if prev.width.min(prev.height) < MIN_COARSE_SIDE * 2 {
            break;
        }
        levels.push(downsample(prev)?);
    }

    Ok(CostPyramid { levels })
}

/// 2x2 box-downsample of one level
fn downsample(level: &CostLevel) -> TraceResult<CostLevel> {
    let w = level.width.div_ceil(2);
    let h = level.height.div_ceil(2);
    let mut data = FloatMap::new(w, h)?;

    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0;
            let mut count = 0.0;
            for dy in 0..2 {
                for dx in 0..2 {
                    let sx = x * 2 + dx;
                    let sy = y * 2 + dy;
                    if sx < level.width && sy < level.height {
                        sum += level.data.get_unchecked(sx, sy);
                        count += 1.0;
                    }
                }
            }
            data.set_unchecked(x, y, sum / count);
        }
    }

    Ok(CostLevel {
        width: w,
        height: h,
        data,
        scale: level.scale * 2,
    })
}
