//! Polygon measurements

use crate::contour::signed_area;
use maproom_core::Point;

/// Absolute polygon area (normalized world units)
pub fn polygon_area(points: &[Point]) -> f64 {
    signed_area(points).abs()
}

/// Area-weighted polygon centroid
///
/// Degenerate polygons (area ~ 0) fall back to the vertex average;
/// an empty polygon returns the origin.
pub fn polygon_centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let a = signed_area(points);
    if a.abs() < 1e-12 {
        let n = points.len() as f64;
        return Point::new(
            points.iter().map(|p| p.x).sum::<f64>() / n,
            points.iter().map(|p| p.y).sum::<f64>() / n,
        );
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    Point::new(cx / (6.0 * a), cy / (6.0 * a))
}

/// Total edge length of the closed polygon
pub fn polygon_perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        sum += points[i].distance_to(points[(i + 1) % points.len()]);
    }
    sum
}
