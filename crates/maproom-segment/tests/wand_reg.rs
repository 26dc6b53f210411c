//! Edge-aware wand regression tests
//!
//! Entrance locking, hard edge stops, deferral reproducibility and the
//! minimum-area safeguard, exercised over synthetic two-room layouts.

use maproom_core::{FloatMap, Point};
use maproom_segment::{
    Connectivity, EdgeWandParams, EntranceZone, WandOptions, magic_wand_with_edges,
    zone_near_contour,
};

const W: u32 = 32;
const H: u32 = 16;

/// One uniform color across the whole layer
fn uniform_layer(r: u8, g: u8, b: u8) -> Vec<u8> {
    let mut rgba = Vec::with_capacity((W * H * 4) as usize);
    for _ in 0..W * H {
        rgba.extend_from_slice(&[r, g, b, 255]);
    }
    rgba
}

/// Vertical edge wall filling the whole column x = 16
fn wall_field() -> FloatMap {
    let mut field = FloatMap::new(W, H).unwrap();
    for y in 0..H {
        field.set_unchecked(16, y, 1.0);
    }
    field
}

fn doorway_zone() -> EntranceZone {
    // Centered on the wall column, two rows tall
    EntranceZone::new(
        "door-east",
        Point::new(16.5 / W as f64, 8.0 / H as f64),
        1.5 / W as f64,
    )
}

#[test]
fn test_edge_stops_growth_without_entrance() {
    let layer = uniform_layer(180, 160, 120);
    let field = wall_field();
    let params = EdgeWandParams {
        edge_magnitudes: &field,
        edge_stop: 0.5,
        entrances: &[],
        rng_seed: 7,
    };
    let result =
        magic_wand_with_edges(&[&layer], W, H, (4, 8), &WandOptions::default(), &params).unwrap();
    assert!(!result.entrance_locked);
    // Wall column and everything past it stays unselected
    for y in 0..H {
        for x in 16..W {
            assert_eq!(result.mask.get(x, y), Some(0), "leaked to ({x},{y})");
        }
    }
    assert_eq!(result.accepted, (16 * H) as usize);
}

#[test]
fn test_entrance_unlocks_growth_and_reports_lock() {
    let layer = uniform_layer(180, 160, 120);
    let field = wall_field();
    let zones = [doorway_zone()];
    let params = EdgeWandParams {
        edge_magnitudes: &field,
        edge_stop: 0.5,
        entrances: &zones,
        rng_seed: 7,
    };
    let result =
        magic_wand_with_edges(&[&layer], W, H, (4, 8), &WandOptions::default(), &params).unwrap();
    assert!(result.entrance_locked);
    assert_eq!(result.locked_entrance_id.as_deref(), Some("door-east"));
    // Growth crossed into the second room
    assert_eq!(result.mask.get(24, 8), Some(255));
    assert!(result.accepted > (16 * H) as usize);
}

#[test]
fn test_deferral_is_reproducible_per_seed() {
    let layer = uniform_layer(90, 140, 200);
    let field = wall_field();
    let run = |seed: u64| {
        let params = EdgeWandParams {
            edge_magnitudes: &field,
            edge_stop: 0.5,
            entrances: &[],
            rng_seed: seed,
        };
        magic_wand_with_edges(&[&layer], W, H, (4, 8), &WandOptions::default(), &params)
            .unwrap()
    };
    let a = run(42);
    let b = run(42);
    assert_eq!(a.mask.data(), b.mask.data());
    assert_eq!(a.accepted, b.accepted);
    // A different seed still accepts the same region; deferral reorders
    // the frontier without changing the accepted set on uniform color.
    let c = run(43);
    assert_eq!(a.accepted, c.accepted);
}

#[test]
fn test_min_area_safeguard_with_edges() {
    // Box the seed in with edges on all sides: growth accepts almost
    // nothing and collapses to the seed pixel.
    let layer = uniform_layer(180, 160, 120);
    let mut field = FloatMap::new(W, H).unwrap();
    for (x, y) in [(3, 8), (5, 8), (4, 7), (4, 9)] {
        field.set_unchecked(x, y, 1.0);
    }
    let params = EdgeWandParams {
        edge_magnitudes: &field,
        edge_stop: 0.5,
        entrances: &[],
        rng_seed: 1,
    };
    let options = WandOptions::default().with_connectivity(Connectivity::FourWay);
    let result = magic_wand_with_edges(&[&layer], W, H, (4, 8), &options, &params).unwrap();
    assert_eq!(result.accepted, 1);
    assert_eq!(result.mask.coverage_count(), 1);
    assert_eq!(result.mask.get(4, 8), Some(255));
    assert!(!result.entrance_locked);
}

#[test]
fn test_post_snap_contour_check_catches_grazed_entrance() {
    // A snapped contour passing close to (but outside) a doorway is
    // still reported by the proximity check at 1.5x radius.
    let zones = [doorway_zone()];
    let zone = &zones[0];
    let graze = Point::new(
        zone.center.x + zone.radius * 1.3,
        zone.center.y,
    );
    let contour = vec![
        Point::new(0.1, 0.1),
        graze,
        Point::new(0.1, 0.9),
    ];
    let hit = zone_near_contour(&contour, &zones).unwrap();
    assert_eq!(hit.id, "door-east");

    let far_contour = vec![Point::new(0.1, 0.1), Point::new(0.2, 0.2)];
    assert!(zone_near_contour(&far_contour, &zones).is_none());
}
