//! Marker → sticky target registry
//!
//! Both markers of a boundary section map to the same target. Lookups are
//! constant time through a [`SecondaryMap`] keyed by the host's element
//! handles.

use slotmap::SecondaryMap;
use tack_platform::ElementId;

/// Maps marker elements to the sticky target they guard
#[derive(Debug, Default, Clone)]
pub struct SentinelRegistry {
    targets: SecondaryMap<ElementId, ElementId>,
    /// Bumped whenever membership changes
    revision: u64,
}

impl SentinelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Map both markers to `target`, replacing any previous mapping
    ///
    /// Returns `true` if the registry changed. Re-registering an identical
    /// triple is a no-op and leaves the revision untouched.
    pub fn register(&mut self, top: ElementId, bottom: ElementId, target: ElementId) -> bool {
        let mut changed = false;
        for marker in [top, bottom] {
            if self.targets.get(marker) != Some(&target) {
                self.targets.insert(marker, target);
                changed = true;
            }
        }
        if changed {
            self.revision += 1;
        }
        changed
    }

    /// The sticky target guarded by `marker`
    pub fn resolve(&self, marker: ElementId) -> Option<ElementId> {
        self.targets.get(marker).copied()
    }

    /// Whether `marker` is registered
    pub fn contains(&self, marker: ElementId) -> bool {
        self.targets.contains_key(marker)
    }

    /// Number of registered markers
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Membership revision, starting at 0 for an empty registry
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
