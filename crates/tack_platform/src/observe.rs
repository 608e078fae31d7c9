//! Intersection observation primitive
//!
//! The host watches an element against a root element and reports, in
//! per-frame batches, every time the element's intersection ratio crosses one
//! of the configured thresholds.
//!
//! ```text
//! scroll / layout
//!     ↓
//! host computes ratio per observer (once per frame)
//!     ↓
//! threshold crossed? → ObservationEntry batch → callback
//! ```

use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::element::ElementId;
use crate::error::Result;
use crate::geometry::Rect;

new_key_type! {
    /// Handle to a running observation
    pub struct ObserverId;
}

/// One crossing record delivered by the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObservationEntry {
    /// The watched element
    pub target: ElementId,
    /// The watched element's bounding rectangle at delivery time
    pub bounding_rect: Rect,
    /// The root's bounding rectangle at delivery time
    pub root_bounds: Rect,
    /// Visible fraction of the watched element inside the root
    pub intersection_ratio: f32,
}

impl ObservationEntry {
    /// Whether the watched element touches the root at all
    pub fn is_intersecting(&self) -> bool {
        self.bounding_rect.touches(&self.root_bounds)
    }
}

/// What an observer watches against, and at which ratios it fires
#[derive(Clone, Debug, PartialEq)]
pub struct ObserverOptions {
    /// Element intersection is measured against
    pub root: ElementId,
    /// Ratios in `0.0..=1.0` whose crossing triggers a delivery
    pub thresholds: SmallVec<[f32; 2]>,
}

impl ObserverOptions {
    /// Options with a single threshold
    pub fn new(root: ElementId, threshold: f32) -> Self {
        Self {
            root,
            thresholds: SmallVec::from_slice(&[threshold]),
        }
    }

    /// Add another threshold
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.thresholds.push(threshold);
        self
    }
}

/// Callback receiving one batch of entries
pub type BatchCallback = Box<dyn FnMut(&[ObservationEntry])>;

/// The host's intersection observation service
pub trait ObservationHost {
    /// Start watching `target`; `callback` is invoked with each batch
    ///
    /// The first frame after observing always delivers the current state.
    fn observe(
        &mut self,
        target: ElementId,
        options: ObserverOptions,
        callback: BatchCallback,
    ) -> Result<ObserverId>;

    /// Stop an observation. Unknown or already-stopped observers are ignored.
    fn unobserve(&mut self, observer: ObserverId);
}
