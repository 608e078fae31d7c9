//! Sentinel geometry
//!
//! The top marker is pulled up by the target's margin-top so that it crosses
//! the root's top edge exactly where the target's margin box does. The bottom
//! marker is a spacer as tall as everything the target occupies:
//!
//! ```text
//!   ┌──────────────┐ ← top marker (offset -margin_top, zero height)
//!   │  margin-top  │
//!   ├──────────────┤
//!   │ padding-top  │
//!   │   height     │   sticky target
//!   │padding-bottom│
//!   └──────────────┘
//!        ...
//!   ┌──────────────┐
//!   │              │ ← bottom marker, height = mt + pt + h + pb
//!   └──────────────┘
//! ```

use tack_platform::{BoxMetrics, CalcLength, ElementId, LengthContext, StyleReader};

use crate::error::Result;

/// Computed marker placement for one boundary section
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SentinelGeometry {
    /// Vertical offset applied to the top marker (`-margin_top`)
    pub top_offset: CalcLength,
    /// Height of the bottom marker
    pub bottom_height: CalcLength,
}

impl SentinelGeometry {
    /// Geometry for a target with the given metrics
    pub fn from_metrics(metrics: &BoxMetrics) -> Self {
        let margin_top = CalcLength::from(metrics.margin_top);
        Self {
            top_offset: -margin_top,
            bottom_height: margin_top + metrics.padding_top + metrics.height + metrics.padding_bottom,
        }
    }

    /// Read `target`'s metrics from the host and compute its geometry
    pub fn measure<R: StyleReader + ?Sized>(reader: &R, target: ElementId) -> Result<Self> {
        let metrics = reader.box_metrics(target)?;
        Ok(Self::from_metrics(&metrics))
    }

    /// Top offset and bottom height in pixels
    pub fn resolve(&self, cx: &LengthContext) -> (f32, f32) {
        (self.top_offset.resolve(cx), self.bottom_height.resolve(cx))
    }
}
