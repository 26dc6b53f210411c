//! Tool state machines
//!
//! Every tool speaks the same pointer protocol behind the [`MaskTool`]
//! trait; switching tools swaps the active trait object, there is no
//! dispatch on a tool tag anywhere. Tools receive a [`ToolContext`] per
//! event with the store, the provider seam, the job runner and the
//! sampled image, build their edits in private working copies, and
//! commit finished masks.
//!
//! Cancellation never touches the committed mask: in-flight async work
//! is invalidated through the request-id token and preview state is
//! dropped.

mod brush;
mod lasso;
mod smart_lasso;
mod wand;

pub use brush::{BrushMode, BrushTool};
pub use lasso::LassoTool;
pub use smart_lasso::SmartLassoTool;
pub use wand::WandTool;

use crate::cache::RoiArtifacts;
use crate::job::JobRunner;
use crate::provider::SegmentationProvider;
use crate::store::{SelectionStore, ToolKind};
use maproom_core::Point;
use maproom_segment::EntranceZone;
use std::sync::Arc;

/// The sampled image a session edits over
#[derive(Debug, Clone)]
pub struct ImageData {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// Wrap an interleaved RGBA buffer
    pub fn new(rgba: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            rgba,
            width,
            height,
        }
    }
}

/// One pointer sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Normalized [0,1] position
    pub position: Point,
    /// Stylus pressure, 1.0 for a mouse
    pub pressure: f64,
}

impl PointerInput {
    /// Full-pressure input at a position
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            pressure: 1.0,
        }
    }

    /// Input with stylus pressure
    pub fn with_pressure(x: f64, y: f64, pressure: f64) -> Self {
        Self {
            position: Point::new(x, y),
            pressure: pressure.clamp(0.0, 1.0),
        }
    }
}

/// Everything a tool needs to handle one event
pub struct ToolContext<'a> {
    pub store: &'a mut SelectionStore,
    pub provider: &'a Arc<dyn SegmentationProvider + Send + Sync>,
    pub runner: &'a dyn JobRunner,
    pub image: &'a Arc<ImageData>,
    /// Prebuilt ROI preprocessing, when the host has it cached
    pub artifacts: Option<&'a Arc<RoiArtifacts>>,
    /// Registered doorways for wand locking
    pub entrances: &'a [EntranceZone],
}

/// Shared pointer protocol for all tools
pub trait MaskTool {
    /// Which tool this is
    fn kind(&self) -> ToolKind;

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput);

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput);

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, input: PointerInput);

    /// Abort the gesture without touching the committed mask
    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>);

    /// Deliver finished async work, if any; hosts call this on their
    /// update tick
    fn poll(&mut self, _ctx: &mut ToolContext<'_>) {}
}

/// Pixel cell under a normalized position
pub(crate) fn pixel_of(image: &ImageData, p: Point) -> (u32, u32) {
    let x = (p.x * image.width as f64).floor().clamp(0.0, image.width as f64 - 1.0);
    let y = (p.y * image.height as f64).floor().clamp(0.0, image.height as f64 - 1.0);
    (x as u32, y as u32)
}

/// Continuous pixel coordinates under a normalized position
pub(crate) fn pixel_pos(image: &ImageData, p: Point) -> (f64, f64) {
    (p.x * image.width as f64, p.y * image.height as f64)
}

/// Feather sigma (pixels) for a normalized feather amount
pub(crate) fn feather_sigma(amount: f64) -> Option<f32> {
    const FEATHER_SIGMA_MAX: f64 = 6.0;
    (amount > 0.0).then(|| (amount.clamp(0.0, 1.0) * FEATHER_SIGMA_MAX) as f32)
}

/// Snap search radius (pixels) for a normalized snap strength
pub(crate) fn snap_radius(strength: f64) -> f64 {
    4.0 + strength.clamp(0.0, 1.0) * 16.0
}
