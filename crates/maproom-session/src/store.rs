//! The selection store
//!
//! One store per editing session owns the committed selection state and
//! a set of change subscribers. Tools never mutate the store mid-gesture;
//! they build a finished mask in a private working copy and commit it,
//! which replaces the store's mask atomically and bumps the version
//! stamp. There is deliberately no global instance.

use maproom_core::RoomMask;
use maproom_segment::Connectivity;

/// Which tool is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Lasso,
    SmartLasso,
    Wand,
    Brush,
}

/// Busy/error status surfaced to the UI
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionStatus {
    #[default]
    Idle,
    /// A gesture or request is in flight
    Busy(String),
    /// The last request failed; the message is display-ready
    Failed(String),
}

/// Tunables shared by the tools
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionTunables {
    /// Brush radius in pixels
    pub brush_radius: f64,
    /// Brush hardness, 0..1
    pub brush_hardness: f64,
    /// Wand Lab tolerance
    pub wand_tolerance: f32,
    /// Wand flood connectivity
    pub wand_connectivity: Connectivity,
    /// Edge snap strength, 0..1; scales the snap search radius
    pub snap_strength: f64,
    /// Feather amount, 0..1; scales the feather sigma
    pub feather_amount: f64,
    /// Refinement band width in pixels
    pub edge_band_width: u32,
    /// Dilate committed masks by the world budget
    pub dilate_enabled: bool,
}

impl Default for SelectionTunables {
    fn default() -> Self {
        Self {
            brush_radius: 8.0,
            brush_hardness: 0.7,
            wand_tolerance: 12.0,
            wand_connectivity: Connectivity::EightWay,
            snap_strength: 0.5,
            feather_amount: 0.0,
            edge_band_width: 6,
            dilate_enabled: false,
        }
    }
}

/// Committed selection state
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub active_tool: ToolKind,
    /// The committed mask, if any
    pub mask: Option<RoomMask>,
    pub tunables: SelectionTunables,
    /// Entrance the last wand selection locked onto
    pub entrance_lock: Option<String>,
    /// Preprocessing cache key for the current region
    pub cache_key: Option<String>,
    pub status: SelectionStatus,
    /// Bumped by every transition
    pub version: u64,
}

/// Subscription handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&SelectionState)>;

/// Per-session store with change subscribers
#[derive(Default)]
pub struct SelectionStore {
    state: SelectionState,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl SelectionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Subscribe to every state transition
    pub fn subscribe(&mut self, listener: impl Fn(&SelectionState) + 'static) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a subscriber
    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    fn transition(&mut self, apply: impl FnOnce(&mut SelectionState)) {
        apply(&mut self.state);
        self.state.version += 1;
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    /// Replace the committed mask
    ///
    /// Takes the mask by value: the committed buffer is never aliased by
    /// a tool's working copy.
    pub fn commit_mask(&mut self, mask: RoomMask) {
        self.transition(|s| {
            s.mask = Some(mask);
            s.entrance_lock = None;
        });
    }

    /// Replace the committed mask and record an entrance lock
    pub fn commit_mask_with_lock(&mut self, mask: RoomMask, entrance: Option<String>) {
        self.transition(|s| {
            s.mask = Some(mask);
            s.entrance_lock = entrance;
        });
    }

    /// Drop the committed mask
    pub fn clear_mask(&mut self) {
        self.transition(|s| {
            s.mask = None;
            s.entrance_lock = None;
        });
    }

    /// Switch the active tool
    pub fn set_active_tool(&mut self, tool: ToolKind) {
        self.transition(|s| s.active_tool = tool);
    }

    /// Update the tunables in place
    pub fn update_tunables(&mut self, update: impl FnOnce(&mut SelectionTunables)) {
        self.transition(|s| update(&mut s.tunables));
    }

    /// Set the busy/error status
    pub fn set_status(&mut self, status: SelectionStatus) {
        self.transition(|s| s.status = status);
    }

    /// Record the preprocessing key of the current region
    pub fn set_cache_key(&mut self, key: Option<String>) {
        self.transition(|s| s.cache_key = key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maproom_core::Bounds;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn mask() -> RoomMask {
        RoomMask::new(4, 4, Bounds::full()).unwrap()
    }

    #[test]
    fn test_commit_replaces_and_bumps_version() {
        let mut store = SelectionStore::new();
        let v0 = store.state().version;
        store.commit_mask(mask());
        assert!(store.state().mask.is_some());
        assert_eq!(store.state().version, v0 + 1);
        store.clear_mask();
        assert!(store.state().mask.is_none());
    }

    #[test]
    fn test_listeners_observe_transitions() {
        let mut store = SelectionStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |s| sink.borrow_mut().push(s.version));
        store.commit_mask(mask());
        store.set_active_tool(ToolKind::Brush);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut store = SelectionStore::new();
        let seen = Rc::new(RefCell::new(0u32));
        let sink = seen.clone();
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);
        store.commit_mask(mask());
        store.unsubscribe(id);
        store.commit_mask(mask());
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_commit_clears_stale_entrance_lock() {
        let mut store = SelectionStore::new();
        store.commit_mask_with_lock(mask(), Some("door-1".into()));
        assert_eq!(store.state().entrance_lock.as_deref(), Some("door-1"));
        store.commit_mask(mask());
        assert_eq!(store.state().entrance_lock, None);
    }

    #[test]
    fn test_tunables_update() {
        let mut store = SelectionStore::new();
        store.update_tunables(|t| t.brush_radius = 20.0);
        assert_eq!(store.state().tunables.brush_radius, 20.0);
    }
}
