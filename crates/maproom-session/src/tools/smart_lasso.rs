//! Smart lasso (live-wire) tool
//!
//! Each pointer down places an anchor; the live-wire path from the last
//! anchor to the pointer is recomputed as a preview, throttled by a
//! minimum-movement threshold. Release closes the loop with one more
//! live-wire query, rasterizes, refines the boundary to nearby edges
//! and commits.

use crate::store::{SelectionStatus, ToolKind};
use crate::tools::{MaskTool, PointerInput, ToolContext, pixel_of};
use maproom_core::{Bounds, Point};
use maproom_segment::RefineOptions;
use maproom_trace::{LiveWireOptions, straight_line, trace_live_wire};

/// Pointer travel below this many pixels skips the preview recompute
const MIN_MOVE_PX: f64 = 3.0;

/// Live-wire boundary tool
#[derive(Debug, Default)]
pub struct SmartLassoTool {
    anchors: Vec<(u32, u32)>,
    /// Committed path through all anchors so far
    path: Vec<(u32, u32)>,
    /// Live preview from the last anchor to the pointer
    preview: Vec<(u32, u32)>,
    last_preview_target: Option<(u32, u32)>,
}

impl SmartLassoTool {
    /// Create an idle smart lasso
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchors placed so far
    pub fn anchors(&self) -> &[(u32, u32)] {
        &self.anchors
    }

    /// Current preview path
    pub fn preview(&self) -> &[(u32, u32)] {
        &self.preview
    }

    fn reset(&mut self) {
        self.anchors.clear();
        self.path.clear();
        self.preview.clear();
        self.last_preview_target = None;
    }

    /// Live-wire between two pixels, straight line without preprocessing
    fn wire(
        ctx: &ToolContext<'_>,
        from: (u32, u32),
        to: (u32, u32),
    ) -> Vec<(u32, u32)> {
        match ctx.artifacts {
            Some(artifacts) => {
                trace_live_wire(&artifacts.pyramid, from, to, &LiveWireOptions::default())
            }
            None => straight_line(from, to),
        }
    }
}

impl MaskTool for SmartLassoTool {
    fn kind(&self) -> ToolKind {
        ToolKind::SmartLasso
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        let anchor = pixel_of(ctx.image, input.position);
        match self.anchors.last() {
            None => {
                self.path.push(anchor);
                ctx.store
                    .set_status(SelectionStatus::Busy("smart lasso".into()));
            }
            Some(&last) => {
                let segment = Self::wire(ctx, last, anchor);
                self.path.extend_from_slice(&segment[1..]);
            }
        }
        self.anchors.push(anchor);
        self.preview.clear();
        self.last_preview_target = None;
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        let Some(&last_anchor) = self.anchors.last() else {
            return;
        };
        let target = pixel_of(ctx.image, input.position);
        if let Some(prev) = self.last_preview_target {
            let dx = prev.0 as f64 - target.0 as f64;
            let dy = prev.1 as f64 - target.1 as f64;
            if (dx * dx + dy * dy).sqrt() < MIN_MOVE_PX {
                return;
            }
        }
        self.preview = Self::wire(ctx, last_anchor, target);
        self.last_preview_target = Some(target);
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        if self.anchors.is_empty() {
            return;
        }
        let release = pixel_of(ctx.image, input.position);
        let last = *self.anchors.last().expect("anchors non-empty");
        let first = self.anchors[0];

        // Path to the release point, then one closing query back to the
        // first anchor
        let mut path = std::mem::take(&mut self.path);
        if release != last {
            let segment = Self::wire(ctx, last, release);
            path.extend_from_slice(&segment[1..]);
        }
        let closing = Self::wire(ctx, release, first);
        if closing.len() > 2 {
            path.extend_from_slice(&closing[1..closing.len() - 1]);
        }
        self.reset();

        let w = ctx.image.width;
        let h = ctx.image.height;
        let polygon: Vec<Point> = path
            .iter()
            .map(|&(x, y)| {
                Point::new(
                    (x as f64 + 0.5) / w as f64,
                    (y as f64 + 0.5) / h as f64,
                )
            })
            .collect();

        if polygon.len() < 3 {
            ctx.store.set_status(SelectionStatus::Idle);
            return;
        }

        let built = ctx
            .provider
            .rasterize_freehand_path(&polygon, w, h, Bounds::full());
        match built {
            Ok(mask) => {
                let band = ctx.store.state().tunables.edge_band_width;
                let refined = match ctx.artifacts {
                    Some(artifacts) => ctx
                        .provider
                        .refine_boundary_to_edges(
                            &mask,
                            &artifacts.energy,
                            &RefineOptions::default().with_band_radius(band),
                        )
                        .unwrap_or(mask),
                    None => mask,
                };
                ctx.store.commit_mask(refined);
                ctx.store.set_status(SelectionStatus::Idle);
            }
            Err(e) => {
                ctx.store.set_status(SelectionStatus::Failed(e.to_string()));
            }
        }
    }

    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.reset();
        ctx.store.set_status(SelectionStatus::Idle);
    }
}
