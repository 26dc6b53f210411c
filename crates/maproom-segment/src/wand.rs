//! Smart wand region growing
//!
//! Click-to-grow selection over sampled map layers. Similarity is
//! perceptual: every sample goes through sRGB -> Lab and is compared to
//! the seed color by Euclidean Lab distance. Contiguous mode grows a
//! BFS flood from the seed; non-contiguous mode thresholds the whole
//! sampled region; with several layers the per-layer distances are
//! averaged before thresholding.
//!
//! The edge-aware variant consumes a precomputed edge-magnitude field
//! as a hard stop, with registered entrance zones as the only way
//! through, and defers a pseudo-random 10% of frontier pops (seeded,
//! reproducible) so growth fronts do not develop axis bias.

use crate::entrance::{EntranceZone, zone_containing};
use crate::error::{SegmentError, SegmentResult};
use maproom_core::{Bounds, FloatMap, Point, RoomMask};
use maproom_filter::{Lab, rgb_to_lab};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::collections::VecDeque;

/// Fraction of frontier pops deferred to the back of the queue
const DEFERRAL_RATE: f32 = 0.1;

/// Connectivity for flood growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// 4-way connectivity (N, S, E, W)
    FourWay,
    /// 8-way connectivity (N, S, E, W and diagonals)
    #[default]
    EightWay,
}

impl Connectivity {
    fn offsets(self) -> &'static [(i32, i32)] {
        const FOUR: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        const EIGHT: [(i32, i32); 8] = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];
        match self {
            Connectivity::FourWay => &FOUR,
            Connectivity::EightWay => &EIGHT,
        }
    }
}

/// Options for wand selection
#[derive(Debug, Clone)]
pub struct WandOptions {
    /// Lab-distance tolerance
    pub tolerance: f32,
    /// Flood connectivity
    pub connectivity: Connectivity,
    /// Grow from the seed only; otherwise threshold the whole region
    pub contiguous: bool,
    /// Anti-aliased falloff ring near the tolerance boundary
    pub antialias: bool,
    /// Selections smaller than this collapse to the seed pixel
    pub min_area: usize,
}

impl Default for WandOptions {
    fn default() -> Self {
        Self {
            tolerance: 12.0,
            connectivity: Connectivity::EightWay,
            contiguous: true,
            antialias: true,
            min_area: 8,
        }
    }
}

impl WandOptions {
    /// Set the Lab tolerance
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Set the connectivity
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Set contiguous growth
    pub fn with_contiguous(mut self, contiguous: bool) -> Self {
        self.contiguous = contiguous;
        self
    }
}

/// Edge-aware growth parameters
#[derive(Debug, Clone)]
pub struct EdgeWandParams<'a> {
    /// Normalized edge magnitudes over the sampled region
    pub edge_magnitudes: &'a FloatMap,
    /// Magnitude at or above which a pixel is a hard stop
    pub edge_stop: f32,
    /// Doorways growth may pass through
    pub entrances: &'a [EntranceZone],
    /// Seed for the deferral RNG; equal seeds give equal growth
    pub rng_seed: u64,
}

/// Result of a wand selection
#[derive(Debug, Clone)]
pub struct WandResult {
    pub mask: RoomMask,
    /// Number of accepted pixels
    pub accepted: usize,
    /// Whether growth passed through an entrance zone
    pub entrance_locked: bool,
    /// The zone it passed through, when locked
    pub locked_entrance_id: Option<String>,
}

/// Per-pixel perceptual distance to the seed color, averaged over layers
struct SeedDistance<'a> {
    layers: &'a [&'a [u8]],
    width: u32,
    seeds: Vec<Lab>,
}

impl<'a> SeedDistance<'a> {
    fn new(
        layers: &'a [&'a [u8]],
        width: u32,
        height: u32,
        seed: (u32, u32),
    ) -> SegmentResult<Self> {
        if layers.is_empty() {
            return Err(SegmentError::NoLayers);
        }
        let expected = width as usize * height as usize * 4;
        for layer in layers {
            if layer.len() != expected {
                return Err(SegmentError::LayerLengthMismatch {
                    expected,
                    actual: layer.len(),
                });
            }
        }
        if seed.0 >= width || seed.1 >= height {
            return Err(SegmentError::InvalidSeed {
                x: seed.0,
                y: seed.1,
            });
        }
        let seeds = layers
            .iter()
            .map(|layer| lab_at(layer, width, seed.0, seed.1))
            .collect();
        Ok(Self {
            layers,
            width,
            seeds,
        })
    }

    fn distance(&self, x: u32, y: u32) -> f32 {
        let mut sum = 0.0;
        for (layer, seed) in self.layers.iter().zip(self.seeds.iter()) {
            sum += lab_at(layer, self.width, x, y).distance_to(*seed);
        }
        sum / self.layers.len() as f32
    }
}

#[inline]
fn lab_at(rgba: &[u8], width: u32, x: u32, y: u32) -> Lab {
    let i = ((y * width + x) * 4) as usize;
    rgb_to_lab(rgba[i], rgba[i + 1], rgba[i + 2])
}

/// Coverage for a pixel at the given distance from the seed color
#[inline]
fn coverage_for(distance: f32, tolerance: f32, antialias: bool) -> u8 {
    if !antialias || tolerance <= 0.0 {
        return 255;
    }
    let ramp_start = tolerance * 0.75;
    if distance <= ramp_start {
        255
    } else {
        let t = (tolerance - distance) / (tolerance - ramp_start);
        (t * 255.0).round().clamp(1.0, 255.0) as u8
    }
}

/// Plain wand selection over sampled layers
///
/// # Errors
///
/// Rejects empty layer lists, mismatched layer buffers and seeds outside
/// the sampled region. Tiny selections are not errors: below `min_area`
/// the result collapses to the single seed pixel.
pub fn magic_wand(
    layers: &[&[u8]],
    width: u32,
    height: u32,
    seed: (u32, u32),
    options: &WandOptions,
) -> SegmentResult<WandResult> {
    let distance = SeedDistance::new(layers, width, height, seed)?;
    let mut mask = RoomMask::new(width, height, Bounds::full())?;
    let mut accepted = 0usize;

    if options.contiguous {
        accepted = flood(&distance, &mut mask, width, height, seed, options, None)?.accepted;
    } else {
        for y in 0..height {
            for x in 0..width {
                let d = distance.distance(x, y);
                if d <= options.tolerance {
                    mask.set_unchecked(x, y, coverage_for(d, options.tolerance, options.antialias));
                    accepted += 1;
                }
            }
        }
    }

    if accepted < options.min_area {
        return Ok(collapse_to_seed(mask, seed));
    }

    Ok(WandResult {
        mask,
        accepted,
        entrance_locked: false,
        locked_entrance_id: None,
    })
}

/// Edge-aware wand selection
///
/// Same contract as [`magic_wand`] in contiguous mode, with the edge
/// field as a hard stop, entrance zones as pass-throughs and seeded
/// deferral for reproducible growth.
pub fn magic_wand_with_edges(
    layers: &[&[u8]],
    width: u32,
    height: u32,
    seed: (u32, u32),
    options: &WandOptions,
    edge: &EdgeWandParams<'_>,
) -> SegmentResult<WandResult> {
    if edge.edge_magnitudes.width() != width || edge.edge_magnitudes.height() != height {
        return Err(SegmentError::FieldSizeMismatch(
            edge.edge_magnitudes.width(),
            edge.edge_magnitudes.height(),
            width,
            height,
        ));
    }

    let distance = SeedDistance::new(layers, width, height, seed)?;
    let mut mask = RoomMask::new(width, height, Bounds::full())?;
    let flood_result = flood(
        &distance,
        &mut mask,
        width,
        height,
        seed,
        options,
        Some(edge),
    )?;

    if flood_result.accepted < options.min_area {
        return Ok(collapse_to_seed(mask, seed));
    }

    Ok(WandResult {
        mask,
        accepted: flood_result.accepted,
        entrance_locked: flood_result.locked_id.is_some(),
        locked_entrance_id: flood_result.locked_id,
    })
}

struct FloodOutcome {
    accepted: usize,
    locked_id: Option<String>,
}

/// BFS flood growth shared by both wand variants
fn flood(
    distance: &SeedDistance<'_>,
    mask: &mut RoomMask,
    width: u32,
    height: u32,
    seed: (u32, u32),
    options: &WandOptions,
    edge: Option<&EdgeWandParams<'_>>,
) -> SegmentResult<FloodOutcome> {
    let mut visited = vec![false; (width * height) as usize];
    let mut deferred_once = vec![false; (width * height) as usize];
    let mut queue = VecDeque::new();
    let mut rng = edge.map(|e| StdRng::seed_from_u64(e.rng_seed));
    let mut accepted = 0usize;
    let mut locked_id: Option<String> = None;

    let idx = |x: u32, y: u32| (y * width + x) as usize;
    visited[idx(seed.0, seed.1)] = true;
    queue.push_back(seed);

    while let Some((x, y)) = queue.pop_front() {
        // Deferral shuffles the frontier order, nothing else; each pixel
        // is deferred at most once so the walk stays linear.
        if let Some(rng) = rng.as_mut() {
            let i = idx(x, y);
            if !deferred_once[i] && !queue.is_empty() && rng.random::<f32>() < DEFERRAL_RATE {
                deferred_once[i] = true;
                queue.push_back((x, y));
                continue;
            }
        }

        let d = distance.distance(x, y);
        let within_tolerance = (x, y) == seed || d <= options.tolerance;
        if !within_tolerance {
            continue;
        }

        if let Some(edge) = edge
            && (x, y) != seed
        {
            let magnitude = edge.edge_magnitudes.get_unchecked(x, y);
            if magnitude >= edge.edge_stop {
                let p = Point::new(
                    (x as f64 + 0.5) / width as f64,
                    (y as f64 + 0.5) / height as f64,
                );
                match zone_containing(edge.entrances, p) {
                    Some(zone) => {
                        // Passing a hard edge inside a doorway locks the
                        // selection onto it
                        locked_id.get_or_insert_with(|| zone.id.clone());
                    }
                    None => continue,
                }
            }
        }

        mask.set_unchecked(x, y, coverage_for(d, options.tolerance, options.antialias));
        accepted += 1;

        for &(dx, dy) in options.connectivity.offsets() {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                continue;
            }
            let (nx, ny) = (nx as u32, ny as u32);
            let i = idx(nx, ny);
            if !visited[i] {
                visited[i] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    Ok(FloodOutcome {
        accepted,
        locked_id,
    })
}

/// Minimum-area safeguard: throw the selection away, keep the seed
fn collapse_to_seed(mut mask: RoomMask, seed: (u32, u32)) -> WandResult {
    mask.fill(0);
    mask.set_unchecked(seed.0, seed.1, 255);
    WandResult {
        mask,
        accepted: 1,
        entrance_locked: false,
        locked_entrance_id: None,
    }
}
