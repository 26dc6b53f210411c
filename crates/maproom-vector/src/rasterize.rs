//! Polygon rasterization
//!
//! Even-odd scanline fill: for every pixel row, the polygon's edges are
//! intersected with the horizontal line through the row's pixel centers
//! and coverage is written between alternating crossing pairs. All
//! geometry is evaluated in world space, so a polygon fills the same
//! region regardless of the mask resolution it lands in.

use crate::error::VectorResult;
use maproom_core::{Bounds, Point, RoomMask};

/// Rasterize a closed polygon into a fresh mask
///
/// Pixel centers inside the polygon (even-odd rule) get full coverage.
/// Fewer than three points is a routine interactive state, not an error:
/// the result is simply an empty mask.
pub fn rasterize_polygon(
    points: &[Point],
    width: u32,
    height: u32,
    bounds: Bounds,
) -> VectorResult<RoomMask> {
    let mut mask = RoomMask::new(width, height, bounds)?;
    if points.len() < 3 {
        return Ok(mask);
    }
    fill_polygon(&mut mask, points, 255);
    Ok(mask)
}

/// Scanline-fill a polygon into an existing mask with the given coverage
pub fn fill_polygon(mask: &mut RoomMask, points: &[Point], coverage: u8) {
    if points.len() < 3 {
        return;
    }

    let width = mask.width();
    let height = mask.height();
    let bounds = mask.bounds();
    let bw = bounds.width();
    let bh = bounds.height();
    if bw <= 0.0 || bh <= 0.0 {
        return;
    }

    let mut crossings: Vec<f64> = Vec::with_capacity(points.len());

    for y in 0..height {
        let wy = bounds.min_y() + (y as f64 + 0.5) / height as f64 * bh;

        crossings.clear();
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            // Half-open interval so a shared vertex counts once
            if (a.y <= wy && b.y > wy) || (b.y <= wy && a.y > wy) {
                let t = (wy - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        if crossings.len() < 2 {
            continue;
        }
        crossings.sort_by(|p, q| p.partial_cmp(q).unwrap());

        for pair in crossings.chunks_exact(2) {
            let (x0, x1) = (pair[0], pair[1]);
            // First pixel whose center is at or right of x0
            let start = ((x0 - bounds.min_x()) / bw * width as f64 - 0.5).ceil().max(0.0) as u32;
            for x in start..width {
                let wx = bounds.min_x() + (x as f64 + 0.5) / width as f64 * bw;
                if wx >= x1 {
                    break;
                }
                let current = mask.get_unchecked(x, y);
                mask.set_unchecked(x, y, current.max(coverage));
            }
        }
    }
}
