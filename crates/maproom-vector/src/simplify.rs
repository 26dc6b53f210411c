//! Polyline simplification
//!
//! Douglas-Peucker driven by an explicit work stack, so very large
//! contours never risk deep recursion, plus near-coincident vertex
//! deduplication.

use maproom_core::Point;

/// Perpendicular distance from `p` to the segment `a`-`b`
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-18 {
        return p.distance_to(a);
    }
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * dx, a.y + t * dy);
    p.distance_to(proj)
}

/// Simplify an open polyline, always keeping both endpoints
pub fn douglas_peucker_open(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((i, j)) = stack.pop() {
        if j <= i + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut max_idx = i;
        for (k, p) in points.iter().enumerate().take(j).skip(i + 1) {
            let d = point_segment_distance(*p, points[i], points[j]);
            if d > max_dist {
                max_dist = d;
                max_idx = k;
            }
        }
        if max_dist > epsilon {
            keep[max_idx] = true;
            stack.push((i, max_idx));
            stack.push((max_idx, j));
        }
    }

    points
        .iter()
        .zip(keep.iter())
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect()
}

/// Simplify a closed polygon (no duplicated end vertex)
///
/// The ring is split at the vertex farthest from vertex 0 so both halves
/// get real chords, then each half is simplified as an open polyline.
pub fn douglas_peucker(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 4 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let far = points
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|(_, a), (_, b)| {
            points[0]
                .distance_to(**a)
                .partial_cmp(&points[0].distance_to(**b))
                .unwrap()
        })
        .map(|(i, _)| i)
        .unwrap_or(points.len() / 2);

    let first_half = &points[..=far];
    let mut second_half: Vec<Point> = points[far..].to_vec();
    second_half.push(points[0]);

    let mut simplified = douglas_peucker_open(first_half, epsilon);
    let tail = douglas_peucker_open(&second_half, epsilon);
    // Both halves carry the split vertex / start vertex; drop duplicates
    simplified.pop();
    simplified.extend_from_slice(&tail[..tail.len() - 1]);
    simplified
}

/// Merge consecutive vertices closer than `min_distance`
///
/// The wrap-around pair (last, first) is merged as well, so the result
/// stays a clean ring.
pub fn dedupe_points(points: &[Point], min_distance: f64) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().is_none_or(|q| q.distance_to(p) >= min_distance) {
            out.push(p);
        }
    }
    while out.len() > 1 && out[0].distance_to(*out.last().unwrap()) < min_distance {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_distance() {
        let d = point_segment_distance(
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
        );
        assert!((d - 1.0).abs() < 1e-12);
        // Beyond the segment end, distance is to the endpoint
        let d = point_segment_distance(
            Point::new(3.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
        );
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_open_simplify_drops_collinear() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.01),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.02),
            Point::new(4.0, 0.0),
        ];
        let out = douglas_peucker_open(&pts, 0.1);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], pts[0]);
        assert_eq!(out[1], pts[4]);
    }

    #[test]
    fn test_open_simplify_keeps_corner() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        let out = douglas_peucker_open(&pts, 0.1);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_closed_simplify_square() {
        // Dense square outline collapses to its 4 corners
        let mut pts = Vec::new();
        for i in 0..10 {
            pts.push(Point::new(i as f64 / 10.0, 0.0));
        }
        for i in 0..10 {
            pts.push(Point::new(1.0, i as f64 / 10.0));
        }
        for i in 0..10 {
            pts.push(Point::new(1.0 - i as f64 / 10.0, 1.0));
        }
        for i in 0..10 {
            pts.push(Point::new(0.0, 1.0 - i as f64 / 10.0));
        }
        let out = douglas_peucker(&pts, 0.01);
        assert_eq!(out.len(), 4, "square should reduce to corners, got {out:?}");
    }

    #[test]
    fn test_dedupe_ring() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0001, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.00005, 0.00005),
        ];
        let out = dedupe_points(&pts, 0.01);
        assert_eq!(out.len(), 3);
    }
}
