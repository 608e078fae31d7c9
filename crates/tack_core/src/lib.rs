//! Tack Core
//!
//! Detects when a sticky element pins to the top of its scroll container and
//! when it lets go, without polling on every frame.
//!
//! Each sticky target is bracketed by two invisible markers:
//!
//! - **Sentinel Geometry**: the top marker is offset by the target's
//!   margin-top and the bottom marker is sized to the target's full extent
//! - **Sentinel Registry**: maps both markers back to the target they guard
//! - **Boundary Observers**: one state machine per marker, fed by the host's
//!   intersection observation batches
//! - **Handlers**: `on_stuck`, `on_unstuck` and `on_change` callbacks
//!
//! # Example
//!
//! ```ignore
//! use tack_core::{BoundarySection, StickyHandlers, ViewportContext};
//!
//! let ctx = ViewportContext::new();
//! ctx.set_viewport_root(scroll_container);
//!
//! let mut section = BoundarySection::new(
//!     &ctx,
//!     StickyHandlers::new().on_change(|t| println!("{} {:?}", t.kind, t.target)),
//! );
//! section.register_sticky_ref(top_marker, bottom_marker, header);
//! section.sync(&mut host);
//! ```

pub mod context;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod observer;
pub mod registry;
pub mod section;
pub mod transition;

pub use context::ViewportContext;
pub use dispatch::{ChangeCallback, StickyHandlers, TargetCallback};
pub use error::{Result, TackError};
pub use geometry::SentinelGeometry;
pub use observer::{classify_bottom, classify_top, BoundaryObserver, Edge, ObserverHandle};
pub use registry::SentinelRegistry;
pub use section::{BoundarySection, SentinelAttachment, Sentinels};
pub use transition::{StickState, Transition, TransitionKind};
