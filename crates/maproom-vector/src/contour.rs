//! Contour extraction
//!
//! Marching squares over a coverage mask: every 2x2 sample cell is
//! classified into one of 16 boundary configurations (the two saddle
//! cases each emit two segments), emitted segments are stitched into
//! closed loops by endpoint matching, and the largest loop becomes the
//! room's boundary polygon.
//!
//! The mask is virtually padded with zero samples so shapes touching
//! the grid border still produce closed loops.

use crate::simplify::{dedupe_points, douglas_peucker};
use maproom_core::{Point, RoomMask};
use std::collections::HashMap;

/// Options for contour extraction
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Coverage value treated as the inside/outside threshold
    pub threshold: u8,
    /// Douglas-Peucker tolerance in pixel units
    pub simplify_tolerance: f64,
    /// Consecutive vertices closer than this (pixels) are merged
    pub dedupe_distance: f64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            threshold: 127,
            simplify_tolerance: 0.35,
            dedupe_distance: 0.05,
        }
    }
}

impl ExtractOptions {
    /// Set the inside/outside threshold
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the simplification tolerance (pixels)
    pub fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        self.simplify_tolerance = tolerance;
        self
    }
}

/// Extract the boundary polygon of a mask with default options
///
/// Returns normalized world-space vertices of the largest closed loop,
/// oriented so the signed area is positive, simplified and deduplicated.
/// An empty mask yields an empty polygon.
pub fn extract_polygon(mask: &RoomMask) -> Vec<Point> {
    extract_polygon_with(mask, &ExtractOptions::default())
}

/// Extract the boundary polygon of a mask
pub fn extract_polygon_with(mask: &RoomMask, options: &ExtractOptions) -> Vec<Point> {
    let loops = trace_loops(mask, options.threshold);
    let Some(best) = largest_loop(loops) else {
        return Vec::new();
    };

    let mut poly = orient_positive(best);
    poly = douglas_peucker(&poly, options.simplify_tolerance);
    poly = dedupe_points(&poly, options.dedupe_distance);
    if poly.len() < 3 {
        return Vec::new();
    }

    // Pixel-center space to clamped world space
    let bounds = mask.bounds();
    let w = mask.width() as f64;
    let h = mask.height() as f64;
    poly.iter()
        .map(|p| {
            Point::new(
                bounds.min_x() + (p.x + 0.5) / w * bounds.width(),
                bounds.min_y() + (p.y + 0.5) / h * bounds.height(),
            )
            .clamped()
        })
        .collect()
}

/// Trace all closed loops of the thresholded mask, in pixel-center space
pub(crate) fn trace_loops(mask: &RoomMask, threshold: u8) -> Vec<Vec<Point>> {
    let width = mask.width() as i32;
    let height = mask.height() as i32;

    let sample = |x: i32, y: i32| -> u8 {
        if x < 0 || y < 0 || x >= width || y >= height {
            0
        } else {
            mask.get_unchecked(x as u32, y as u32)
        }
    };

    let mut segments: Vec<(Point, Point)> = Vec::new();

    // Virtual padding ring: cells run one sample beyond every border
    for y in -1..height {
        for x in -1..width {
            let tl = sample(x, y);
            let tr = sample(x + 1, y);
            let br = sample(x + 1, y + 1);
            let bl = sample(x, y + 1);

            let case = u8::from(tl > threshold)
                | u8::from(tr > threshold) << 1
                | u8::from(br > threshold) << 2
                | u8::from(bl > threshold) << 3;

            if case == 0 || case == 15 {
                continue;
            }

            let fx = x as f64;
            let fy = y as f64;
            let top = interpolate(tl, tr, threshold, fx, fy, fx + 1.0, fy);
            let right = interpolate(tr, br, threshold, fx + 1.0, fy, fx + 1.0, fy + 1.0);
            let bottom = interpolate(bl, br, threshold, fx, fy + 1.0, fx + 1.0, fy + 1.0);
            let left = interpolate(tl, bl, threshold, fx, fy, fx, fy + 1.0);

            match case {
                1 => segments.push((left, top)),
                2 => segments.push((top, right)),
                3 => segments.push((left, right)),
                4 => segments.push((right, bottom)),
                5 => {
                    // Saddle: two opposing corners inside
                    segments.push((left, top));
                    segments.push((right, bottom));
                }
                6 => segments.push((top, bottom)),
                7 => segments.push((left, bottom)),
                8 => segments.push((bottom, left)),
                9 => segments.push((bottom, top)),
                10 => {
                    segments.push((top, left));
                    segments.push((bottom, right));
                }
                11 => segments.push((bottom, right)),
                12 => segments.push((right, left)),
                13 => segments.push((right, top)),
                14 => segments.push((top, left)),
                _ => {}
            }
        }
    }

    stitch_loops(segments)
}

/// Interpolate the threshold crossing along one cell edge
fn interpolate(v1: u8, v2: u8, threshold: u8, x1: f64, y1: f64, x2: f64, y2: f64) -> Point {
    if v1 == v2 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }
    let t = (threshold as f64 + 0.5 - v1 as f64) / (v2 as f64 - v1 as f64);
    let t = t.clamp(0.0, 1.0);
    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Quantized endpoint key for exact-enough matching
fn endpoint_key(p: Point) -> (i64, i64) {
    ((p.x * 256.0).round() as i64, (p.y * 256.0).round() as i64)
}

/// Stitch undirected segments into closed loops
///
/// Runs over an explicit work list: endpoints index into a hash of
/// quantized positions, so stitching is linear in the segment count and
/// never recurses.
fn stitch_loops(segments: Vec<(Point, Point)>) -> Vec<Vec<Point>> {
    let mut by_endpoint: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, (a, b)) in segments.iter().enumerate() {
        by_endpoint.entry(endpoint_key(*a)).or_default().push(i);
        by_endpoint.entry(endpoint_key(*b)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut loops = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (first, mut cursor) = segments[start];
        let mut points = vec![first, cursor];

        loop {
            let key = endpoint_key(cursor);
            let Some(candidates) = by_endpoint.get(&key) else {
                break;
            };
            let Some(&next) = candidates.iter().find(|&&i| !used[i]) else {
                break;
            };
            used[next] = true;
            let (a, b) = segments[next];
            cursor = if endpoint_key(a) == key { b } else { a };
            if endpoint_key(cursor) == endpoint_key(first) {
                break;
            }
            points.push(cursor);
        }

        if points.len() >= 3 {
            loops.push(points);
        }
    }

    loops
}

/// Shoelace signed area of a closed polygon
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Keep only the loop with the largest absolute area
fn largest_loop(mut loops: Vec<Vec<Point>>) -> Option<Vec<Point>> {
    let mut best: Option<(f64, usize)> = None;
    for (i, l) in loops.iter().enumerate() {
        let area = signed_area(l).abs();
        if best.is_none_or(|(a, _)| area > a) {
            best = Some((area, i));
        }
    }
    best.map(|(_, i)| loops.swap_remove(i))
}

/// Flip vertex order when the signed area is negative
fn orient_positive(mut points: Vec<Point>) -> Vec<Point> {
    if signed_area(&points) < 0.0 {
        points.reverse();
    }
    points
}
