//! Computed box metrics and the style reader trait

use crate::element::ElementId;
use crate::error::Result;
use crate::length::Length;

/// The resolved box metrics of an element that sentinel geometry depends on
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxMetrics {
    pub margin_top: Length,
    pub padding_top: Length,
    pub height: Length,
    pub padding_bottom: Length,
}

impl BoxMetrics {
    /// Metrics with only a content height
    pub fn with_height(height: Length) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    /// Set the top margin
    pub fn margin_top(mut self, margin_top: Length) -> Self {
        self.margin_top = margin_top;
        self
    }

    /// Set the top padding
    pub fn padding_top(mut self, padding_top: Length) -> Self {
        self.padding_top = padding_top;
        self
    }

    /// Set the bottom padding
    pub fn padding_bottom(mut self, padding_bottom: Length) -> Self {
        self.padding_bottom = padding_bottom;
        self
    }
}

/// Reads computed style from the host
///
/// Implementations return [`PlatformError::Detached`](crate::PlatformError::Detached)
/// for elements that exist but have no computed style yet.
pub trait StyleReader {
    /// Resolved margin-top, padding-top, height and padding-bottom of `element`
    fn box_metrics(&self, element: ElementId) -> Result<BoxMetrics>;
}
