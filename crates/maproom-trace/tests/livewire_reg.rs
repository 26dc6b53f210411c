//! Live-wire regression tests
//!
//! Corridor confinement and the diagonal-movement property from the
//! engine's contract: a path between two points inside a cheap corridor
//! never touches the expensive walls, and turning diagonals off can
//! only increase how far the path strays from the diagonal-enabled one.

use maproom_core::FloatMap;
use maproom_trace::{LiveWireOptions, build_cost_pyramid, trace_live_wire};

const WALL: f32 = 1000.0;
const FLOOR: f32 = 0.01;

/// 64x64 grid of wall cost with a horizontal corridor in rows 24..32
fn corridor_grid() -> FloatMap {
    let mut data = vec![WALL; 64 * 64];
    for y in 24..32 {
        for x in 0..64 {
            data[y * 64 + x] = FLOOR;
        }
    }
    FloatMap::from_data(64, 64, data).unwrap()
}

fn is_wall(p: (u32, u32)) -> bool {
    !(24..32).contains(&p.1)
}

#[test]
fn test_corridor_path_avoids_walls() {
    let pyramid = build_cost_pyramid(&corridor_grid(), 3).unwrap();
    for allow_diagonals in [true, false] {
        let options = LiveWireOptions {
            allow_diagonals,
            ..Default::default()
        };
        let path = trace_live_wire(&pyramid, (2, 27), (60, 28), &options);
        assert_eq!(*path.first().unwrap(), (2, 27));
        assert_eq!(*path.last().unwrap(), (60, 28));
        for &p in &path {
            assert!(!is_wall(p), "path entered wall cell {p:?}");
        }
    }
}

#[test]
fn test_diagonal_corridor_deviation_property() {
    // Uniform cost: the ideal route from (4,4) to (44,44) is the exact
    // diagonal. With diagonals the path can follow it; without, it must
    // staircase around it.
    let flat = FloatMap::from_data(48, 48, vec![1.0; 48 * 48]).unwrap();
    let pyramid = build_cost_pyramid(&flat, 1).unwrap();

    let deviation = |path: &[(u32, u32)]| -> f64 {
        // Max perpendicular distance from the y = x line
        path.iter()
            .map(|&(x, y)| ((x as f64 - y as f64).abs()) / 2.0f64.sqrt())
            .fold(0.0, f64::max)
    };

    let with = trace_live_wire(
        &pyramid,
        (4, 4),
        (44, 44),
        &LiveWireOptions::default(),
    );
    let without = trace_live_wire(
        &pyramid,
        (4, 4),
        (44, 44),
        &LiveWireOptions::default().with_diagonals(false),
    );

    assert!(
        deviation(&without) >= deviation(&with),
        "4-connected deviation {} < 8-connected {}",
        deviation(&without),
        deviation(&with)
    );
}

#[test]
fn test_unreachable_target_falls_back_to_line() {
    // Hard vertical wall of infinite cost is still traversable by cost,
    // so force unreachability with a corridor rectangle: separate grids
    // joined nowhere cannot happen in one connected grid, so emulate by
    // an all-wall grid where the only cheap cells are the endpoints.
    let mut data = vec![WALL; 32 * 32];
    data[5 * 32 + 5] = FLOOR;
    data[20 * 32 + 20] = FLOOR;
    let pyramid = build_cost_pyramid(&FloatMap::from_data(32, 32, data).unwrap(), 2).unwrap();

    // Dijkstra still finds a (very expensive) path, so this checks the
    // pinned endpoints rather than the fallback branch; the fallback
    // itself is covered by unit tests on straight_line.
    let path = trace_live_wire(&pyramid, (5, 5), (20, 20), &LiveWireOptions::default());
    assert_eq!(*path.first().unwrap(), (5, 5));
    assert_eq!(*path.last().unwrap(), (20, 20));
}

#[test]
fn test_thin_corridor_survives_refinement() {
    // The corridor band is wide enough to survive 2x downsampling; the
    // refined fine-level path must stay inside it end to end.
    let pyramid = build_cost_pyramid(&corridor_grid(), 2).unwrap();
    let path = trace_live_wire(&pyramid, (1, 25), (62, 30), &LiveWireOptions::default());
    assert!(path.iter().all(|&p| !is_wall(p)));
}
