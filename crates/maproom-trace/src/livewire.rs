//! Live-wire tracing
//!
//! Coarse-to-fine shortest path through a cost pyramid: a full Dijkstra
//! at the coarsest level, then at every finer level the search is
//! restricted to a bounding corridor around the previous level's path,
//! so the fine search touches a sliver of the grid.
//!
//! An unreachable target degrades to a straight line; during an
//! interactive drag that happens constantly and must not raise.

use crate::cost::{CostLevel, CostPyramid};
use std::collections::BinaryHeap;

/// Options for live-wire tracing
#[derive(Debug, Clone)]
pub struct LiveWireOptions {
    /// Allow diagonal moves (weighted sqrt(2)); otherwise 4-connected
    pub allow_diagonals: bool,
    /// Base corridor margin in level cells; the margin widens at finer
    /// levels
    pub corridor_margin: u32,
}

impl Default for LiveWireOptions {
    fn default() -> Self {
        Self {
            allow_diagonals: true,
            corridor_margin: 4,
        }
    }
}

impl LiveWireOptions {
    /// Set diagonal movement
    pub fn with_diagonals(mut self, allow: bool) -> Self {
        self.allow_diagonals = allow;
        self
    }
}

/// Trace the minimum-cost path between two pixels of the finest level
///
/// Endpoints are clamped into the grid; the returned path always starts
/// at the (clamped) start and ends at the (clamped) end. When no path
/// exists the result is the straight line between them.
pub fn trace_live_wire(
    pyramid: &CostPyramid,
    start: (u32, u32),
    end: (u32, u32),
    options: &LiveWireOptions,
) -> Vec<(u32, u32)> {
    let finest = pyramid.finest();
    let start = clamp_point(start, finest.width(), finest.height());
    let end = clamp_point(end, finest.width(), finest.height());
    if start == end {
        return vec![start];
    }

    let levels = pyramid.levels();
    let coarsest_idx = levels.len() - 1;

    // Full-grid search at the coarsest level
    let level = &levels[coarsest_idx];
    let full = (0, 0, level.width() - 1, level.height() - 1);
    let mut path = match dijkstra(
        level,
        scale_down(start, level.scale()),
        scale_down(end, level.scale()),
        full,
        options.allow_diagonals,
    ) {
        Some(p) => p,
        None => return straight_line(start, end),
    };

    // Refine level by level inside a corridor around the previous path
    for idx in (0..coarsest_idx).rev() {
        let level = &levels[idx];
        let margin = options.corridor_margin * (coarsest_idx - idx) as u32 + options.corridor_margin;
        let corridor = corridor_around(&path, level, margin);
        let s = scale_down(start, level.scale());
        let e = scale_down(end, level.scale());
        let corridor = include_point(include_point(corridor, s), e);

        path = match dijkstra(level, s, e, corridor, options.allow_diagonals) {
            Some(p) => p,
            None => return straight_line(start, end),
        };
    }

    path
}

#[inline]
fn clamp_point(p: (u32, u32), width: u32, height: u32) -> (u32, u32) {
    (p.0.min(width - 1), p.1.min(height - 1))
}

#[inline]
fn scale_down(p: (u32, u32), scale: u32) -> (u32, u32) {
    (p.0 / scale, p.1 / scale)
}

/// Bounding box of the previous path upsampled into this level's units
fn corridor_around(path: &[(u32, u32)], level: &CostLevel, margin: u32) -> (u32, u32, u32, u32) {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    for &(x, y) in path {
        let x = x * 2;
        let y = y * 2;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x + 1);
        max_y = max_y.max(y + 1);
    }
    (
        min_x.saturating_sub(margin),
        min_y.saturating_sub(margin),
        (max_x + margin).min(level.width() - 1),
        (max_y + margin).min(level.height() - 1),
    )
}

fn include_point(rect: (u32, u32, u32, u32), p: (u32, u32)) -> (u32, u32, u32, u32) {
    (
        rect.0.min(p.0),
        rect.1.min(p.1),
        rect.2.max(p.0),
        rect.3.max(p.1),
    )
}

const SQRT2: f32 = std::f32::consts::SQRT_2;

#[derive(PartialEq)]
struct HeapEntry {
    cost: f32,
    index: usize,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so BinaryHeap pops the cheapest entry first
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra over one level restricted to an inclusive cell rectangle
fn dijkstra(
    level: &CostLevel,
    start: (u32, u32),
    end: (u32, u32),
    rect: (u32, u32, u32, u32),
    allow_diagonals: bool,
) -> Option<Vec<(u32, u32)>> {
    let width = level.width() as usize;
    let (rx0, ry0, rx1, ry1) = rect;
    let inside =
        |x: u32, y: u32| -> bool { x >= rx0 && x <= rx1 && y >= ry0 && y <= ry1 };
    if !inside(start.0, start.1) || !inside(end.0, end.1) {
        return None;
    }

    let cell_count = width * level.height() as usize;
    let mut dist = vec![f32::INFINITY; cell_count];
    let mut prev = vec![usize::MAX; cell_count];
    let mut heap = BinaryHeap::new();

    let idx = |x: u32, y: u32| -> usize { y as usize * width + x as usize };
    let start_idx = idx(start.0, start.1);
    let end_idx = idx(end.0, end.1);
    dist[start_idx] = 0.0;
    heap.push(HeapEntry {
        cost: 0.0,
        index: start_idx,
    });

    const AXIS_STEPS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
    const DIAG_STEPS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

    while let Some(HeapEntry { cost, index }) = heap.pop() {
        if index == end_idx {
            break;
        }
        if cost > dist[index] {
            continue;
        }
        let x = (index % width) as u32;
        let y = (index / width) as u32;
        let here = level.data().get_unchecked(x, y);

        let mut visit = |dx: i32, dy: i32, step_weight: f32| {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 {
                return;
            }
            let (nx, ny) = (nx as u32, ny as u32);
            if nx >= level.width() || ny >= level.height() || !inside(nx, ny) {
                return;
            }
            let there = level.data().get_unchecked(nx, ny);
            let weight = (here + there) * 0.5 * step_weight;
            let next_cost = cost + weight;
            let nidx = idx(nx, ny);
            if next_cost < dist[nidx] {
                dist[nidx] = next_cost;
                prev[nidx] = index;
                heap.push(HeapEntry {
                    cost: next_cost,
                    index: nidx,
                });
            }
        };

        for (dx, dy) in AXIS_STEPS {
            visit(dx, dy, 1.0);
        }
        if allow_diagonals {
            for (dx, dy) in DIAG_STEPS {
                visit(dx, dy, SQRT2);
            }
        }
    }

    if dist[end_idx].is_infinite() {
        return None;
    }

    // Walk predecessors back to the start
    let mut path = Vec::new();
    let mut cursor = end_idx;
    loop {
        path.push(((cursor % width) as u32, (cursor / width) as u32));
        if cursor == start_idx {
            break;
        }
        cursor = prev[cursor];
    }
    path.reverse();
    Some(path)
}

/// Bresenham straight line, the unreachable-target fallback
pub fn straight_line(start: (u32, u32), end: (u32, u32)) -> Vec<(u32, u32)> {
    let (mut x0, mut y0) = (start.0 as i64, start.1 as i64);
    let (x1, y1) = (end.0 as i64, end.1 as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut out = Vec::with_capacity((dx - dy) as usize + 1);
    loop {
        out.push((x0 as u32, y0 as u32));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::build_cost_pyramid;
    use maproom_core::FloatMap;

    /// Flat cost grid, every cell 1.0
    fn flat_pyramid(w: u32, h: u32, depth: u32) -> CostPyramid {
        let base = FloatMap::from_data(w, h, vec![1.0; (w * h) as usize]).unwrap();
        build_cost_pyramid(&base, depth).unwrap()
    }

    #[test]
    fn test_endpoints_pinned() {
        let pyramid = flat_pyramid(64, 64, 3);
        let path = trace_live_wire(&pyramid, (5, 7), (50, 40), &LiveWireOptions::default());
        assert_eq!(*path.first().unwrap(), (5, 7));
        assert_eq!(*path.last().unwrap(), (50, 40));
    }

    #[test]
    fn test_path_is_connected() {
        let pyramid = flat_pyramid(48, 48, 3);
        let path = trace_live_wire(&pyramid, (2, 2), (45, 30), &LiveWireOptions::default());
        for pair in path.windows(2) {
            let dx = (pair[0].0 as i32 - pair[1].0 as i32).abs();
            let dy = (pair[0].1 as i32 - pair[1].1 as i32).abs();
            assert!(dx <= 1 && dy <= 1, "gap between {:?} and {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_four_connected_has_no_diagonal_steps() {
        let pyramid = flat_pyramid(32, 32, 2);
        let options = LiveWireOptions::default().with_diagonals(false);
        let path = trace_live_wire(&pyramid, (1, 1), (20, 25), &options);
        for pair in path.windows(2) {
            let dx = (pair[0].0 as i32 - pair[1].0 as i32).abs();
            let dy = (pair[0].1 as i32 - pair[1].1 as i32).abs();
            assert_eq!(dx + dy, 1, "diagonal step in 4-connected path");
        }
    }

    #[test]
    fn test_same_start_end() {
        let pyramid = flat_pyramid(16, 16, 2);
        let path = trace_live_wire(&pyramid, (4, 4), (4, 4), &LiveWireOptions::default());
        assert_eq!(path, vec![(4, 4)]);
    }

    #[test]
    fn test_out_of_range_endpoints_clamped() {
        let pyramid = flat_pyramid(16, 16, 1);
        let path = trace_live_wire(&pyramid, (500, 500), (0, 0), &LiveWireOptions::default());
        assert_eq!(*path.first().unwrap(), (15, 15));
        assert_eq!(*path.last().unwrap(), (0, 0));
    }

    #[test]
    fn test_straight_line_endpoints() {
        let line = straight_line((3, 9), (9, 3));
        assert_eq!(*line.first().unwrap(), (3, 9));
        assert_eq!(*line.last().unwrap(), (9, 3));
    }
}
