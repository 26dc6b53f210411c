//! Polygon edge snapping and smoothing
//!
//! Snapping nudges each polygon vertex along its outward normal to the
//! strongest nearby image edge. Candidates are scored by edge magnitude
//! minus a distance penalty and an orientation penalty; the orientation
//! term rejects edges that run parallel to the search direction, which
//! the normal should cross, not ride.

use maproom_core::Point;
use maproom_filter::EdgeMap;

/// Options for edge snapping
#[derive(Debug, Clone)]
pub struct SnapOptions {
    /// Search radius in edge-map pixels
    pub radius: f64,
    /// Distance penalty weight (fraction of max magnitude at full radius)
    pub distance_weight: f64,
    /// Orientation penalty weight
    pub orientation_weight: f64,
    /// Minimum score gain to move a vertex, as a fraction of the map's
    /// maximum magnitude
    pub min_gain: f64,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            radius: 12.0,
            distance_weight: 0.3,
            orientation_weight: 0.4,
            min_gain: 0.05,
        }
    }
}

impl SnapOptions {
    /// Set the search radius (pixels)
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius.max(1.0);
        self
    }
}

/// Snap polygon vertices to nearby edges
///
/// Vertices are normalized [0,1] coordinates over the edge map extent.
/// A vertex moves only when some position along its normal beats the
/// current position by more than `min_gain * max_magnitude`; otherwise
/// it stays put.
pub fn snap_polygon_to_edges(points: &[Point], edges: &EdgeMap, options: &SnapOptions) -> Vec<Point> {
    if points.len() < 3 || edges.max_magnitude() <= 0.0 {
        return points.to_vec();
    }

    let w = edges.width() as f64;
    let h = edges.height() as f64;
    let max_mag = edges.max_magnitude() as f64;
    let step = (options.radius / 24.0).max(0.25);
    let steps = (options.radius / step).ceil() as i32;

    let sample_mag = |px: f64, py: f64| -> f64 {
        let x = px.round().clamp(0.0, w - 1.0) as u32;
        let y = py.round().clamp(0.0, h - 1.0) as u32;
        edges.magnitude_at(x, y).unwrap_or(0.0) as f64
    };
    let sample_grad = |px: f64, py: f64| -> (f64, f64) {
        let x = px.round().clamp(0.0, w - 1.0) as u32;
        let y = py.round().clamp(0.0, h - 1.0) as u32;
        (
            edges.gradient_x().get(x, y).unwrap_or(0.0) as f64,
            edges.gradient_y().get(x, y).unwrap_or(0.0) as f64,
        )
    };

    let n = points.len();
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let vertex = points[i];
        let next = points[(i + 1) % n];

        // Outward normal from the incoming/outgoing edge directions,
        // evaluated in pixel space
        let (vx, vy) = (vertex.x * w, vertex.y * h);
        let dir_x = (next.x - prev.x) * w;
        let dir_y = (next.y - prev.y) * h;
        let len = (dir_x * dir_x + dir_y * dir_y).sqrt();
        if len < 1e-9 {
            out.push(vertex);
            continue;
        }
        let (nx, ny) = (-dir_y / len, dir_x / len);

        let score_at = |t: f64| -> f64 {
            let px = vx + nx * t;
            let py = vy + ny * t;
            let mag = sample_mag(px, py);
            let (gx, gy) = sample_grad(px, py);
            let glen = (gx * gx + gy * gy).sqrt();
            // Edge runs across the search when the gradient is parallel
            // to the normal; penalize the perpendicular case
            let alignment = if glen > 1e-9 {
                ((gx * nx + gy * ny) / glen).abs()
            } else {
                0.0
            };
            let distance_penalty =
                max_mag * options.distance_weight * (t.abs() / options.radius);
            let orientation_penalty = max_mag * options.orientation_weight * (1.0 - alignment);
            mag - distance_penalty - orientation_penalty
        };

        let here = score_at(0.0);
        let mut best_t = 0.0;
        let mut best = here;
        for s in -steps..=steps {
            let t = s as f64 * step;
            let score = score_at(t);
            if score > best {
                best = score;
                best_t = t;
            }
        }

        if best - here > options.min_gain * max_mag {
            out.push(
                Point::new((vx + nx * best_t) / w, (vy + ny * best_t) / h).clamped(),
            );
        } else {
            out.push(vertex);
        }
    }

    out
}

/// Iterative neighbor-averaging polygon smoothing
///
/// Each pass pulls every vertex toward the midpoint of its neighbors by
/// `strength`; output stays clamped to [0,1].
pub fn smooth_polygon(points: &[Point], iterations: u32, strength: f64) -> Vec<Point> {
    if points.len() < 3 || iterations == 0 {
        return points.to_vec();
    }
    let strength = strength.clamp(0.0, 1.0);
    let n = points.len();
    let mut current = points.to_vec();

    for _ in 0..iterations {
        let mut next = Vec::with_capacity(n);
        for i in 0..n {
            let prev = current[(i + n - 1) % n];
            let p = current[i];
            let nxt = current[(i + 1) % n];
            let mid_x = (prev.x + nxt.x) / 2.0;
            let mid_y = (prev.y + nxt.y) / 2.0;
            next.push(
                Point::new(
                    p.x + (mid_x - p.x) * strength,
                    p.y + (mid_y - p.y) * strength,
                )
                .clamped(),
            );
        }
        current = next;
    }
    current
}
