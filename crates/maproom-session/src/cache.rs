//! ROI preprocessing cache
//!
//! Preprocessing a region of interest is the expensive part of every
//! assisted gesture: grayscale, local contrast, denoise, edge map, cost
//! field, cost pyramid. The cache builds that chain once per key and
//! hands out shared immutable artifacts.
//!
//! Entries are build-then-publish: the build runs under the cache lock,
//! so a concurrent reader either misses entirely or sees the finished
//! artifact set, never a half-built one. Eviction is LRU with a
//! configurable capacity; staleness has no automatic detection and only
//! an explicit [`RoiCache::clear`] recovers.

use crate::error::SessionResult;
use maproom_core::{FloatMap, GrayMap};
use maproom_filter::{
    ContrastOptions, EdgeMap, build_edge_map, enhance_local_contrast, gaussian_blur,
    luma_from_rgba, normalize,
};
use maproom_trace::{
    CostPyramid, DEFAULT_PYRAMID_DEPTH, build_cost_pyramid, edge_following_cost,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Sigma of the denoise blur in the preprocessing chain
const DENOISE_SIGMA: f32 = 1.0;

/// Grid size of the approximate content hash
const HASH_GRID: u32 = 8;

/// Options for the cache
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Maximum number of entries; `None` disables eviction entirely
    pub capacity: Option<usize>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { capacity: Some(64) }
    }
}

impl CacheOptions {
    /// Set the entry capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity.max(1));
        self
    }

    /// Disable eviction
    pub fn unbounded(mut self) -> Self {
        self.capacity = None;
        self
    }
}

/// Immutable preprocessing artifacts for one region of interest
#[derive(Debug)]
pub struct RoiArtifacts {
    pub grayscale: GrayMap,
    pub enhanced: GrayMap,
    pub denoised: GrayMap,
    pub edges: EdgeMap,
    /// Normalized edge energy, 0..1
    pub energy: FloatMap,
    /// Edge-following cost field (cheap on edges)
    pub cost_field: FloatMap,
    pub pyramid: CostPyramid,
}

/// Cache usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct CacheEntry {
    artifacts: Arc<RoiArtifacts>,
    last_used: u64,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    clock: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Shared preprocessing cache
pub struct RoiCache {
    inner: Mutex<CacheInner>,
    capacity: Option<usize>,
}

impl RoiCache {
    /// Create a cache
    pub fn new(options: CacheOptions) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity: options.capacity,
        }
    }

    /// Fetch the artifacts for `key`, building them on a miss
    ///
    /// # Errors
    ///
    /// Propagates any preprocessing failure; a failed build publishes
    /// nothing.
    pub fn get_or_build(
        &self,
        key: &str,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> SessionResult<Arc<RoiArtifacts>> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.clock += 1;
        let clock = inner.clock;

        if let Some(entry) = inner.entries.get_mut(key) {
            entry.last_used = clock;
            let artifacts = entry.artifacts.clone();
            inner.hits += 1;
            return Ok(artifacts);
        }

        inner.misses += 1;
        let artifacts = Arc::new(build_artifacts(rgba, width, height)?);
        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                artifacts: artifacts.clone(),
                last_used: clock,
            },
        );

        if let Some(capacity) = self.capacity {
            while inner.entries.len() > capacity {
                let oldest = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_used)
                    .map(|(k, _)| k.clone())
                    .expect("non-empty over capacity");
                inner.entries.remove(&oldest);
                inner.evictions += 1;
            }
        }

        Ok(artifacts)
    }

    /// Current usage counters
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().expect("cache lock poisoned");
        CacheStats {
            entries: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
        }
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        *inner = CacheInner::default();
    }
}

impl Default for RoiCache {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

/// Approximate content key: FNV-1a over the ROI rectangle and an 8x8
/// coarse sample grid
///
/// Collision-tolerant by design; two regions that hash together merely
/// share preprocessing, they do not corrupt each other.
pub fn content_key(rgba: &[u8], width: u32, height: u32, rect: (u32, u32, u32, u32)) -> String {
    const FNV_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

    let mut hash = FNV_OFFSET;
    let mut mix = |byte: u8| {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    };

    let (rx, ry, rw, rh) = rect;
    for v in [rx, ry, rw, rh] {
        for b in v.to_le_bytes() {
            mix(b);
        }
    }

    for gy in 0..HASH_GRID {
        for gx in 0..HASH_GRID {
            let x = (rx + gx * rw.max(1) / HASH_GRID).min(width.saturating_sub(1));
            let y = (ry + gy * rh.max(1) / HASH_GRID).min(height.saturating_sub(1));
            let i = ((y * width + x) * 4) as usize;
            if i + 3 < rgba.len() {
                mix(rgba[i]);
                mix(rgba[i + 1]);
                mix(rgba[i + 2]);
                mix(rgba[i + 3]);
            }
        }
    }

    format!("roi-{hash:016x}")
}

fn build_artifacts(rgba: &[u8], width: u32, height: u32) -> SessionResult<RoiArtifacts> {
    let grayscale = luma_from_rgba(rgba, width, height)?;
    let enhanced = enhance_local_contrast(&grayscale, &ContrastOptions::default())?;
    let denoised = gaussian_blur(&enhanced, DENOISE_SIGMA)?;
    let edges = build_edge_map(&denoised)?;
    let energy = normalize(edges.magnitudes());
    let cost_field = edge_following_cost(&energy);
    let pyramid = build_cost_pyramid(&cost_field, DEFAULT_PYRAMID_DEPTH)?;
    Ok(RoiArtifacts {
        grayscale,
        enhanced,
        denoised,
        edges,
        energy,
        cost_field,
        pyramid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_rgba(w: u32, h: u32, salt: u8) -> Vec<u8> {
        let mut rgba = Vec::with_capacity((w * h * 4) as usize);
        for y in 0..h {
            for x in 0..w {
                let v = if (x + y) % 2 == 0 { 200 } else { salt };
                rgba.extend_from_slice(&[v, v, v, 255]);
            }
        }
        rgba
    }

    #[test]
    fn test_hit_reuses_entry() {
        let cache = RoiCache::default();
        let rgba = checker_rgba(16, 16, 30);
        let a = cache.get_or_build("k", &rgba, 16, 16).unwrap();
        let b = cache.get_or_build("k", &rgba, 16, 16).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = RoiCache::new(CacheOptions::default().with_capacity(2));
        let rgba = checker_rgba(8, 8, 30);
        cache.get_or_build("a", &rgba, 8, 8).unwrap();
        cache.get_or_build("b", &rgba, 8, 8).unwrap();
        // Touch "a" so "b" is the LRU victim
        cache.get_or_build("a", &rgba, 8, 8).unwrap();
        cache.get_or_build("c", &rgba, 8, 8).unwrap();
        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.evictions, 1);
        // "b" was evicted: fetching it again is a miss
        cache.get_or_build("b", &rgba, 8, 8).unwrap();
        assert_eq!(cache.stats().misses, 4);
    }

    #[test]
    fn test_clear_resets() {
        let cache = RoiCache::default();
        let rgba = checker_rgba(8, 8, 30);
        cache.get_or_build("a", &rgba, 8, 8).unwrap();
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_content_key_distinguishes_content() {
        let a = checker_rgba(16, 16, 30);
        let b = checker_rgba(16, 16, 31);
        let rect = (0, 0, 16, 16);
        assert_ne!(content_key(&a, 16, 16, rect), content_key(&b, 16, 16, rect));
        assert_eq!(content_key(&a, 16, 16, rect), content_key(&a, 16, 16, rect));
        // Same content, different rectangle
        assert_ne!(
            content_key(&a, 16, 16, (0, 0, 8, 8)),
            content_key(&a, 16, 16, rect)
        );
    }

    #[test]
    fn test_artifacts_chain_is_complete() {
        let cache = RoiCache::default();
        let rgba = checker_rgba(32, 32, 10);
        let artifacts = cache.get_or_build("k", &rgba, 32, 32).unwrap();
        assert_eq!(artifacts.grayscale.width(), 32);
        assert_eq!(artifacts.energy.width(), 32);
        assert!(artifacts.edges.max_magnitude() > 0.0);
        assert!(!artifacts.pyramid.levels().is_empty());
        // Energy is normalized
        assert!(artifacts.energy.max_value() <= 1.0 + 1e-6);
    }
}
