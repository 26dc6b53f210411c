//! Freehand lasso tool
//!
//! idle -> drawing (accumulate freehand points, live preview) -> release
//! rasterizes, fills, feathers and commits.

use crate::store::{SelectionStatus, ToolKind};
use crate::tools::{MaskTool, PointerInput, ToolContext, feather_sigma};
use maproom_core::{Bounds, Point};
use maproom_segment::dilation_radius_for;

/// Minimum pointer travel between accumulated samples, in pixels
const MIN_SAMPLE_PX: f64 = 1.5;

/// Freehand region tool
#[derive(Debug, Default)]
pub struct LassoTool {
    points: Vec<Point>,
    drawing: bool,
}

impl LassoTool {
    /// Create an idle lasso
    pub fn new() -> Self {
        Self::default()
    }

    /// Preview of the accumulated freehand path
    pub fn preview(&self) -> &[Point] {
        &self.points
    }

    fn reset(&mut self) {
        self.points.clear();
        self.drawing = false;
    }
}

impl MaskTool for LassoTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Lasso
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        self.points.clear();
        self.points.push(input.position.clamped());
        self.drawing = true;
        ctx.store.set_status(SelectionStatus::Busy("lasso".into()));
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        if !self.drawing {
            return;
        }
        let p = input.position.clamped();
        let min_step = MIN_SAMPLE_PX / ctx.image.width.max(ctx.image.height) as f64;
        if self.points.last().is_none_or(|last| last.distance_to(p) >= min_step) {
            self.points.push(p);
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        if !self.drawing {
            return;
        }
        self.on_pointer_move(ctx, input);
        let points = std::mem::take(&mut self.points);
        self.drawing = false;

        // Fewer than three samples is a click, not a region
        if points.len() < 3 {
            ctx.store.set_status(SelectionStatus::Idle);
            return;
        }

        let built = ctx.provider.rasterize_freehand_path(
            &points,
            ctx.image.width,
            ctx.image.height,
            Bounds::full(),
        );
        match built {
            Ok(mut mask) => {
                let tunables = ctx.store.state().tunables.clone();
                if let Some(sigma) = feather_sigma(tunables.feather_amount)
                    && let Ok(feathered) = ctx.provider.feather_mask(&mask, sigma)
                {
                    mask = feathered;
                }
                if tunables.dilate_enabled
                    && let Ok(dilated) =
                        ctx.provider.dilate_mask(&mask, dilation_radius_for(&mask))
                {
                    mask = dilated;
                }
                ctx.store.commit_mask(mask);
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
