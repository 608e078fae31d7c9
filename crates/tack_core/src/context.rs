//! Per-viewport shared state
//!
//! Every boundary section nested in one scroll container shares a sentinel
//! registry and the viewport root. A [`ViewportContext`] is created once per
//! viewport and handed down explicitly to each section, so independent
//! viewports never see each other's markers.
//!
//! Writes (registration, root assignment) happen at mount time; observers
//! only read.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tack_platform::ElementId;

use crate::error::{Result, TackError};
use crate::registry::SentinelRegistry;

#[derive(Default)]
struct ContextInner {
    registry: RwLock<SentinelRegistry>,
    root: RwLock<Option<ElementId>>,
}

/// Registry and viewport root shared by the sections of one scroll container
///
/// Cloning is cheap and yields a handle to the same state.
#[derive(Clone, Default)]
pub struct ViewportContext {
    inner: Arc<ContextInner>,
}

impl ViewportContext {
    /// Create a context with an empty registry and no root
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> RwLockReadGuard<'_, SentinelRegistry> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, SentinelRegistry> {
        self.inner
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Establish the scroll container all sections observe against
    pub fn set_viewport_root(&self, root: ElementId) {
        let mut current = self.inner.root.write().unwrap_or_else(PoisonError::into_inner);
        if *current != Some(root) {
            tracing::debug!(root = root.to_raw(), "viewport root set");
            *current = Some(root);
        }
    }

    /// The current viewport root, if one has been set
    pub fn viewport_root(&self) -> Option<ElementId> {
        *self.inner.root.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// The viewport root, or [`TackError::NoViewportRoot`]
    pub fn require_root(&self) -> Result<ElementId> {
        self.viewport_root().ok_or(TackError::NoViewportRoot)
    }

    /// Associate both markers of a section with its sticky target
    ///
    /// Returns `true` if registry membership changed.
    pub fn register_sticky_ref(&self, top: ElementId, bottom: ElementId, target: ElementId) -> bool {
        let changed = self.registry_mut().register(top, bottom, target);
        if changed {
            tracing::debug!(
                top = top.to_raw(),
                bottom = bottom.to_raw(),
                sticky = target.to_raw(),
                "sticky target registered"
            );
        }
        changed
    }

    /// The sticky target guarded by `marker`
    pub fn resolve(&self, marker: ElementId) -> Option<ElementId> {
        self.registry().resolve(marker)
    }

    /// The sticky target guarded by `marker`, or [`TackError::NotRegistered`]
    pub fn require(&self, marker: ElementId) -> Result<ElementId> {
        self.resolve(marker).ok_or(TackError::NotRegistered(marker))
    }

    /// Registry membership revision
    pub fn registry_revision(&self) -> u64 {
        self.registry().revision()
    }

    /// Number of registered markers
    pub fn registered_markers(&self) -> usize {
        self.registry().len()
    }
}

impl std::fmt::Debug for ViewportContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportContext")
            .field("root", &self.viewport_root())
            .field("registered_markers", &self.registered_markers())
            .field("revision", &self.registry_revision())
            .finish()
    }
}
