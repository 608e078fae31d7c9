//! Transition handlers
//!
//! Each boundary section carries three optional callbacks. A transition runs
//! the kind-specific handler first, then `on_change`:
//!
//! ```rust
//! use tack_core::StickyHandlers;
//!
//! let handlers = StickyHandlers::new()
//!     .on_stuck(|target| println!("pinned {:?}", target))
//!     .on_change(|t| println!("{} {:?}", t.kind, t.target));
//! ```

use std::fmt;
use std::sync::Arc;

use tack_platform::ElementId;

use crate::transition::{Transition, TransitionKind};

/// Callback receiving the sticky target of a transition
pub type TargetCallback = Arc<dyn Fn(ElementId) + Send + Sync>;

/// Callback receiving the full transition
pub type ChangeCallback = Arc<dyn Fn(&Transition) + Send + Sync>;

/// The caller's stuck/unstuck/change handlers; unset handlers do nothing
#[derive(Clone, Default)]
pub struct StickyHandlers {
    on_stuck: Option<TargetCallback>,
    on_unstuck: Option<TargetCallback>,
    on_change: Option<ChangeCallback>,
}

impl StickyHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the target when it becomes pinned
    pub fn on_stuck<F>(mut self, f: F) -> Self
    where
        F: Fn(ElementId) + Send + Sync + 'static,
    {
        self.on_stuck = Some(Arc::new(f));
        self
    }

    /// Called with the target when it returns to normal flow
    pub fn on_unstuck<F>(mut self, f: F) -> Self
    where
        F: Fn(ElementId) + Send + Sync + 'static,
    {
        self.on_unstuck = Some(Arc::new(f));
        self
    }

    /// Called after either of the above with the full transition
    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&Transition) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    /// Run the handlers for `transition`, synchronously and in order
    pub fn dispatch(&self, transition: &Transition) {
        let specific = match transition.kind {
            TransitionKind::Stuck => &self.on_stuck,
            TransitionKind::Unstuck => &self.on_unstuck,
        };
        if let Some(callback) = specific {
            callback(transition.target);
        }
        if let Some(callback) = &self.on_change {
            callback(transition);
        }
    }
}

impl fmt::Debug for StickyHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyHandlers")
            .field("on_stuck", &self.on_stuck.is_some())
            .field("on_unstuck", &self.on_unstuck.is_some())
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
