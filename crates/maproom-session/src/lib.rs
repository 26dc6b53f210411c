//! maproom-session - Session-level orchestration
//!
//! This crate ties the algorithm crates to interactive editing:
//!
//! - **ROI cache** - memoized preprocessing chain per region key
//! - **Selection store** - per-session state with change subscribers
//! - **Tools** - lasso, smart lasso, wand and brush behind one pointer
//!   protocol
//! - **Jobs** - cancellable background requests with stale-result
//!   discard
//! - **Provider seam** - segmentation capability trait so synchronous
//!   and offloaded implementations are interchangeable
//!
//! # Examples
//!
//! ```
//! use maproom_session::{
//!     ImageData, InlineRunner, LassoTool, LocalProvider, MaskTool, PointerInput,
//!     SegmentationProvider, SelectionStore, ToolContext,
//! };
//! use std::sync::Arc;
//!
//! let mut store = SelectionStore::new();
//! let provider: Arc<dyn SegmentationProvider + Send + Sync> = Arc::new(LocalProvider);
//! let image = Arc::new(ImageData::new(vec![0; 32 * 32 * 4], 32, 32));
//! let runner = InlineRunner;
//! let mut tool = LassoTool::new();
//!
//! let mut ctx = ToolContext {
//!     store: &mut store,
//!     provider: &provider,
//!     runner: &runner,
//!     image: &image,
//!     artifacts: None,
//!     entrances: &[],
//! };
//! tool.on_pointer_down(&mut ctx, PointerInput::at(0.2, 0.2));
//! tool.on_pointer_move(&mut ctx, PointerInput::at(0.8, 0.2));
//! tool.on_pointer_move(&mut ctx, PointerInput::at(0.8, 0.8));
//! tool.on_pointer_up(&mut ctx, PointerInput::at(0.2, 0.8));
//! assert!(store.state().mask.is_some());
//! ```

pub mod cache;
pub mod error;
pub mod job;
pub mod provider;
pub mod store;
pub mod tools;

pub use cache::{CacheOptions, CacheStats, RoiArtifacts, RoiCache, content_key};
pub use error::{SessionError, SessionResult};
pub use job::{
    CancelToken, InlineRunner, JobHandle, JobRunner, RequestTracker, ThreadRunner, spawn_job,
};
pub use provider::{LocalProvider, SegmentationProvider};
pub use store::{
    ListenerId, SelectionState, SelectionStatus, SelectionStore, SelectionTunables, ToolKind,
};
pub use tools::{
    BrushMode, BrushTool, ImageData, LassoTool, MaskTool, PointerInput, SmartLassoTool,
    ToolContext, WandTool,
};
