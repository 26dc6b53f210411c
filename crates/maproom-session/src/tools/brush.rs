//! Paintbrush tool
//!
//! Pointer down clones the committed mask (or starts blank) into a
//! working copy; every move paints the segment from the previous sample
//! and commits immediately, so the drag previews live; release drops
//! the working copy. Erasing paints stamp coverage into a scratch mask
//! and scales the working copy down by it.

use crate::store::{SelectionStatus, ToolKind};
use crate::tools::{MaskTool, PointerInput, ToolContext, pixel_pos};
use maproom_core::{Bounds, RoomMask};
use maproom_segment::{BrushOptions, StrokePoint, paint_stroke};

/// Whether the brush adds or removes coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushMode {
    #[default]
    Add,
    Erase,
}

/// Freehand paint/erase tool
#[derive(Debug, Default)]
pub struct BrushTool {
    mode: BrushMode,
    working: Option<RoomMask>,
    last_sample: Option<StrokePoint>,
}

impl BrushTool {
    /// Create an idle brush
    pub fn new(mode: BrushMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Current paint mode
    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    /// Switch between adding and erasing
    pub fn set_mode(&mut self, mode: BrushMode) {
        self.mode = mode;
    }

    fn brush_options(ctx: &ToolContext<'_>) -> BrushOptions {
        let tunables = &ctx.store.state().tunables;
        BrushOptions::default()
            .with_radius(tunables.brush_radius)
            .with_hardness(tunables.brush_hardness)
    }

    /// Paint the segment from the previous sample into the working copy
    fn apply_segment(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        let Some(working) = self.working.as_mut() else {
            return;
        };
        let (x, y) = pixel_pos(ctx.image, input.position);
        let sample = StrokePoint::with_pressure(x, y, input.pressure);
        let stroke = match self.last_sample {
            Some(prev) => vec![prev, sample],
            None => vec![sample],
        };
        self.last_sample = Some(sample);

        let options = Self::brush_options(ctx);
        match self.mode {
            BrushMode::Add => {
                if paint_stroke(working, &stroke, &options).is_err() {
                    return;
                }
            }
            BrushMode::Erase => {
                let Ok(mut coverage) =
                    RoomMask::new(working.width(), working.height(), working.bounds())
                else {
                    return;
                };
                if paint_stroke(&mut coverage, &stroke, &options).is_err() {
                    return;
                }
                if working.erase_scaled(&coverage).is_err() {
                    return;
                }
            }
        }
        // Live preview: the working copy is cloned out, never aliased
        ctx.store.commit_mask(working.clone());
    }
}

impl MaskTool for BrushTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Brush
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        let working = match ctx.store.state().mask.as_ref() {
            Some(mask) => mask.clone(),
            None => {
                let Ok(blank) = RoomMask::new(ctx.image.width, ctx.image.height, Bounds::full())
                else {
                    return;
                };
                blank
            }
        };
        self.working = Some(working);
        self.last_sample = None;
        ctx.store.set_status(SelectionStatus::Busy("brush".into()));
        self.apply_segment(ctx, input);
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        self.apply_segment(ctx, input);
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput) {
        if self.working.is_none() {
            return;
        }
        self.apply_segment(ctx, input);
        self.working = None;
        self.last_sample = None;
        ctx.store.set_status(SelectionStatus::Idle);
    }

    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.working = None;
        self.last_sample = None;
        ctx.store.set_status(SelectionStatus::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::InlineRunner;
    use crate::provider::{LocalProvider, SegmentationProvider};
    use crate::store::SelectionStore;
    use crate::tools::ImageData;
    use std::sync::Arc;

    fn blank_image(w: u32, h: u32) -> Arc<ImageData> {
        Arc::new(ImageData::new(vec![0; (w * h * 4) as usize], w, h))
    }

    fn provider() -> Arc<dyn SegmentationProvider + Send + Sync> {
        Arc::new(LocalProvider)
    }

    #[test]
    fn test_drag_paints_and_commits_live() {
        let mut store = SelectionStore::new();
        let provider = provider();
        let image = blank_image(64, 64);
        let runner = InlineRunner;
        let mut tool = BrushTool::new(BrushMode::Add);
        let mut ctx = ToolContext {
            store: &mut store,
            provider: &provider,
            runner: &runner,
            image: &image,
            artifacts: None,
            entrances: &[],
        };
        tool.on_pointer_down(&mut ctx, PointerInput::at(0.25, 0.5));
        let mid_drag = ctx.store.state().mask.as_ref().unwrap().coverage_count();
        assert!(mid_drag > 0, "down stamp not committed");
        tool.on_pointer_move(&mut ctx, PointerInput::at(0.75, 0.5));
        tool.on_pointer_up(&mut ctx, PointerInput::at(0.75, 0.5));
        let final_count = store.state().mask.as_ref().unwrap().coverage_count();
        assert!(final_count > mid_drag, "drag did not extend the stroke");
        // The stroke is continuous between the two samples
        let mask = store.state().mask.as_ref().unwrap();
        for x in 16..=48u32 {
            assert!(mask.get(x, 32).unwrap() > 0, "gap at column {x}");
        }
    }

    #[test]
    fn test_erase_cuts_into_committed_mask() {
        let mut store = SelectionStore::new();
        let provider = provider();
        let image = blank_image(32, 32);
        let runner = InlineRunner;
        let mut full = RoomMask::new(32, 32, Bounds::full()).unwrap();
        full.fill(255);
        store.commit_mask(full);

        let mut tool = BrushTool::new(BrushMode::Erase);
        let mut ctx = ToolContext {
            store: &mut store,
            provider: &provider,
            runner: &runner,
            image: &image,
            artifacts: None,
            entrances: &[],
        };
        tool.on_pointer_down(&mut ctx, PointerInput::at(0.5, 0.5));
        tool.on_pointer_up(&mut ctx, PointerInput::at(0.5, 0.5));
        let mask = store.state().mask.as_ref().unwrap();
        assert_eq!(mask.get(16, 16), Some(0), "center not erased");
        assert_eq!(mask.get(2, 2), Some(255), "far corner touched");
    }

    #[test]
    fn test_pressure_scales_stamp() {
        let mut store = SelectionStore::new();
        let provider = provider();
        let image = blank_image(64, 64);
        let runner = InlineRunner;
        let mut tool = BrushTool::new(BrushMode::Add);

        let mut ctx = ToolContext {
            store: &mut store,
            provider: &provider,
            runner: &runner,
            image: &image,
            artifacts: None,
            entrances: &[],
        };
        tool.on_pointer_down(&mut ctx, PointerInput::with_pressure(0.5, 0.5, 0.3));
        tool.on_pointer_up(&mut ctx, PointerInput::with_pressure(0.5, 0.5, 0.3));
        let light = store.state().mask.as_ref().unwrap().coverage_count();

        store.clear_mask();
        let mut ctx = ToolContext {
            store: &mut store,
            provider: &provider,
            runner: &runner,
            image: &image,
            artifacts: None,
            entrances: &[],
        };
        tool.on_pointer_down(&mut ctx, PointerInput::at(0.5, 0.5));
        tool.on_pointer_up(&mut ctx, PointerInput::at(0.5, 0.5));
        let full = store.state().mask.as_ref().unwrap().coverage_count();
        assert!(light < full);
    }

    #[test]
    fn test_cancel_keeps_committed_state() {
        let mut store = SelectionStore::new();
        let provider = provider();
        let image = blank_image(32, 32);
        let runner = InlineRunner;
        let mut tool = BrushTool::new(BrushMode::Add);
        let mut ctx = ToolContext {
            store: &mut store,
            provider: &provider,
            runner: &runner,
            image: &image,
            artifacts: None,
            entrances: &[],
        };
        tool.on_pointer_down(&mut ctx, PointerInput::at(0.5, 0.5));
        tool.on_cancel(&mut ctx);
        assert_eq!(store.state().status, SelectionStatus::Idle);
        // Moves after a cancel are ignored
        let version = store.state().version;
        let mut ctx = ToolContext {
            store: &mut store,
            provider: &provider,
            runner: &runner,
            image: &image,
            artifacts: None,
            entrances: &[],
        };
        tool.on_pointer_move(&mut ctx, PointerInput::at(0.8, 0.8));
        assert_eq!(store.state().version, version);
    }
}
