//! Smart wand tool
//!
//! A single click issues a cancellable segmentation request; the result
//! lands through [`MaskTool::poll`]. Every click supersedes the previous
//! request through the shared request tracker, so only the latest result
//! is ever applied. A failed request falls back to a small circular mask
//! around the seed instead of erroring mid-gesture.

use crate::job::{JobHandle, RequestTracker, spawn_job};
use crate::provider::SegmentationProvider;
use crate::store::{SelectionStatus, ToolKind};
use crate::tools::{MaskTool, PointerInput, ToolContext, pixel_of, snap_radius};
use maproom_core::{Bounds, RoomMask};
use maproom_filter::EdgeMap;
use maproom_segment::{
    BrushOptions, EdgeWandParams, EntranceZone, WandOptions, stamp_disc, zone_near_contour,
};
use maproom_trace::{SnapOptions, snap_polygon_to_edges};
use maproom_vector::extract_polygon;
use std::sync::Arc;

/// Normalized edge energy at or above this value is a hard stop
const EDGE_STOP: f32 = 0.35;

/// Radius (pixels) of the fallback mask around the seed
const FALLBACK_RADIUS: f64 = 6.0;

/// What a finished wand request delivers
struct WandOutcome {
    mask: RoomMask,
    accepted: usize,
    entrance_id: Option<String>,
}

/// Click-to-grow selection tool
pub struct WandTool {
    tracker: RequestTracker,
    pending: Option<JobHandle<Result<WandOutcome, String>>>,
    /// Seed pixel of the in-flight request, for the fallback mask
    seed: Option<(u32, u32)>,
    /// Accepted pixel count of the last commit, surfaced for debug overlays
    last_accepted: usize,
}

impl WandTool {
    /// Create an idle wand
    pub fn new() -> Self {
        Self {
            tracker: RequestTracker::new(),
            pending: None,
            seed: None,
            last_accepted: 0,
        }
    }

    /// Whether a request is in flight
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Accepted pixel count of the last committed selection
    pub fn last_accepted(&self) -> usize {
        self.last_accepted
    }

    /// Circular mask around the seed, the defined failure fallback
    fn fallback_mask(width: u32, height: u32, seed: (u32, u32)) -> Option<RoomMask> {
        let mut mask = RoomMask::new(width, height, Bounds::full()).ok()?;
        let options = BrushOptions::default()
            .with_radius(FALLBACK_RADIUS)
            .with_hardness(1.0);
        stamp_disc(
            &mut mask,
            (seed.0 as f64 + 0.5, seed.1 as f64 + 0.5),
            &options,
            1.0,
        );
        Some(mask)
    }
}

impl Default for WandTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the background request needs, cloned out of the context
struct WandRequest {
    provider: Arc<dyn SegmentationProvider + Send + Sync>,
    image: Arc<crate::tools::ImageData>,
    seed: (u32, u32),
    options: WandOptions,
    edges: Option<Arc<WandEdges>>,
    entrances: Vec<EntranceZone>,
    snap_strength: f64,
}

/// Edge-aware inputs shared with the job
struct WandEdges {
    energy: maproom_core::FloatMap,
    edge_map: EdgeMap,
}

fn run_wand_request(req: WandRequest) -> Result<WandOutcome, String> {
    let params = req.edges.as_ref().map(|e| EdgeWandParams {
        edge_magnitudes: &e.energy,
        edge_stop: EDGE_STOP,
        entrances: &req.entrances,
        // Equal seeds grow identically across repeated clicks
        rng_seed: ((req.seed.0 as u64) << 32) | req.seed.1 as u64,
    });
    let result = req
        .provider
        .magic_wand_select(
            &[&req.image.rgba],
            req.image.width,
            req.image.height,
            req.seed,
            &req.options,
            params.as_ref(),
        )
        .map_err(|e| e.to_string())?;

    let mut mask = result.mask;
    let mut accepted = result.accepted;
    let mut entrance_id = result.locked_entrance_id;

    // Snap the grown contour onto nearby edges, then re-check entrance
    // proximity: snapping can pull the boundary onto a doorway growth
    // never passed through.
    if let Some(edges) = req.edges.as_ref()
        && req.snap_strength > 0.0
    {
        let contour = extract_polygon(&mask);
        if contour.len() >= 3 {
            let snapped = snap_polygon_to_edges(
                &contour,
                &edges.edge_map,
                &SnapOptions::default().with_radius(snap_radius(req.snap_strength)),
            );
            if snapped != contour {
                let rebuilt = req
                    .provider
                    .rasterize_freehand_path(
                        &snapped,
                        req.image.width,
                        req.image.height,
                        Bounds::full(),
                    )
                    .map_err(|e| e.to_string())?;
                accepted = rebuilt.coverage_count();
                mask = rebuilt;
            }
            if entrance_id.is_none() {
                entrance_id = zone_near_contour(&snapped, &req.entrances).map(|z| z.id.clone());
            }
        }
    }

    Ok(WandOutcome {
        mask,
        accepted,
        entrance_id,
    })
}

impl MaskTool for WandTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Wand
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        let seed = pixel_of(ctx.image, input.position);
        let tunables = ctx.store.state().tunables.clone();
        let request = WandRequest {
            provider: ctx.provider.clone(),
            image: ctx.image.clone(),
            seed,
            options: WandOptions::default()
                .with_tolerance(tunables.wand_tolerance)
                .with_connectivity(tunables.wand_connectivity),
            edges: ctx.artifacts.map(|a| {
                Arc::new(WandEdges {
                    energy: a.energy.clone(),
                    edge_map: a.edges.clone(),
                })
            }),
            entrances: ctx.entrances.to_vec(),
            snap_strength: tunables.snap_strength,
        };

        // Issuing supersedes any in-flight click
        let token = self.tracker.issue();
        self.seed = Some(seed);
        self.pending = Some(spawn_job(ctx.runner, token, move |token| {
            if token.is_cancelled() {
                return Err("cancelled".into());
            }
            run_wand_request(request)
        }));
        ctx.store.set_status(SelectionStatus::Busy("magic wand".into()));
    }

    fn on_pointer_move(&mut self, _ctx: &mut ToolContext<'_>, _input: PointerInput) {}

    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>, _input: PointerInput) {}

    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.tracker.cancel_all();
        self.pending = None;
        self.seed = None;
        ctx.store.set_status(SelectionStatus::Idle);
    }

    fn poll(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(handle) = self.pending.as_ref() else {
            return;
        };
        let Some(result) = handle.try_result() else {
            return;
        };
        let stale = handle.token().is_cancelled();
        self.pending = None;
        let seed = self.seed.take();

        // A superseded request delivers into the void
        if stale {
            return;
        }

        match result {
            Ok(outcome) => {
                self.last_accepted = outcome.accepted;
                ctx.store
                    .commit_mask_with_lock(outcome.mask, outcome.entrance_id);
                ctx.store.set_status(SelectionStatus::Idle);
            }
            Err(message) => {
                let fallback = seed
                    .and_then(|s| Self::fallback_mask(ctx.image.width, ctx.image.height, s));
                match fallback {
                    Some(mask) => {
                        self.last_accepted = mask.coverage_count();
                        ctx.store.commit_mask(mask);
                        ctx.store.set_status(SelectionStatus::Idle);
                    }
                    None => ctx.store.set_status(SelectionStatus::Failed(message)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::InlineRunner;
    use crate::provider::LocalProvider;
    use crate::store::SelectionStore;
    use crate::tools::ImageData;

    fn two_tone_image(w: u32, h: u32) -> Arc<ImageData> {
        let mut rgba = Vec::with_capacity((w * h * 4) as usize);
        for _y in 0..h {
            for x in 0..w {
                let c: [u8; 4] = if x < w / 2 {
                    [200, 40, 40, 255]
                } else {
                    [40, 40, 200, 255]
                };
                rgba.extend_from_slice(&c);
            }
        }
        Arc::new(ImageData::new(rgba, w, h))
    }

    fn provider() -> Arc<dyn SegmentationProvider + Send + Sync> {
        Arc::new(LocalProvider)
    }

    #[test]
    fn test_click_commits_selected_half() {
        let mut store = SelectionStore::new();
        let provider = provider();
        let image = two_tone_image(16, 16);
        let mut tool = WandTool::new();
        let runner = InlineRunner;
        let mut ctx = ToolContext {
            store: &mut store,
            provider: &provider,
            runner: &runner,
            image: &image,
            artifacts: None,
            entrances: &[],
        };
        tool.on_pointer_down(&mut ctx, PointerInput::at(0.1, 0.5));
        assert!(tool.is_busy());
        tool.poll(&mut ctx);
        assert!(!tool.is_busy());
        let mask = store.state().mask.as_ref().expect("mask committed");
        assert_eq!(mask.coverage_count(), 8 * 16);
        assert_eq!(store.state().status, SelectionStatus::Idle);
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut store = SelectionStore::new();
        let provider = provider();
        let image = two_tone_image(16, 16);
        let mut tool = WandTool::new();
        let runner = InlineRunner;
        let mut ctx = ToolContext {
            store: &mut store,
            provider: &provider,
            runner: &runner,
            image: &image,
            artifacts: None,
            entrances: &[],
        };
        tool.on_pointer_down(&mut ctx, PointerInput::at(0.1, 0.5));
        tool.on_cancel(&mut ctx);
        tool.poll(&mut ctx);
        assert!(store.state().mask.is_none());
        assert_eq!(store.state().status, SelectionStatus::Idle);
    }

    #[test]
    fn test_second_click_supersedes_first() {
        let mut store = SelectionStore::new();
        let provider = provider();
        let image = two_tone_image(16, 16);
        let mut tool = WandTool::new();
        let runner = InlineRunner;
        let mut ctx = ToolContext {
            store: &mut store,
            provider: &provider,
            runner: &runner,
            image: &image,
            artifacts: None,
            entrances: &[],
        };
        // With the inline runner both jobs finish, but only the second
        // handle survives; its token is the live one.
        tool.on_pointer_down(&mut ctx, PointerInput::at(0.1, 0.5));
        tool.on_pointer_down(&mut ctx, PointerInput::at(0.9, 0.5));
        tool.poll(&mut ctx);
        let mask = store.state().mask.as_ref().expect("mask committed");
        // The right half was selected by the surviving request
        assert!(mask.get(12, 8).unwrap() > 0);
        assert_eq!(mask.get(2, 8), Some(0));
    }
}
