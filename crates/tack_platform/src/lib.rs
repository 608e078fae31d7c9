//! Tack Platform Abstraction Layer
//!
//! This crate provides the host-facing types and traits the sticky boundary
//! detector is written against:
//!
//! - [`ElementId`] - Opaque handles to host elements
//! - [`Rect`] - Bounding rectangles and intersection ratios
//! - [`Length`] / [`CalcLength`] - CSS-style lengths and calc() sums
//! - [`StyleReader`] - Computed box metrics of an element
//! - [`ObservationHost`] - Threshold-based intersection observation
//!
//! # Host Implementations
//!
//! - `tack_headless` - In-memory document with a simulated scroll container

mod element;
mod error;
mod geometry;
mod length;
mod observe;
mod style;

// Re-export all public types
pub use element::ElementId;
pub use error::{PlatformError, Result};
pub use geometry::Rect;
pub use length::{CalcLength, Length, LengthContext};
pub use observe::{BatchCallback, ObservationEntry, ObservationHost, ObserverId, ObserverOptions};
pub use style::{BoxMetrics, StyleReader};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::element::ElementId;
    pub use crate::error::{PlatformError, Result};
    pub use crate::geometry::Rect;
    pub use crate::length::{CalcLength, Length, LengthContext};
    pub use crate::observe::{
        BatchCallback, ObservationEntry, ObservationHost, ObserverId, ObserverOptions,
    };
    pub use crate::style::{BoxMetrics, StyleReader};
}
