//! Boundary sections
//!
//! A boundary section pairs one sticky target with its top and bottom
//! markers. The surrounding component tree drives it through three calls:
//!
//! ```ignore
//! let mut section = BoundarySection::new(&ctx, handlers);
//!
//! // Once the marker and target elements exist
//! section.register_sticky_ref(top, bottom, target);
//!
//! // After every render: measure if needed, start observing if possible
//! section.sync(&mut host);
//! let attachment = section.attach_sentinels(); // marker refs + computed styles
//!
//! // When the section goes away
//! section.unmount(&mut host);
//! ```
//!
//! `sync` never fails. A target that cannot be measured keeps the previous
//! geometry, and a missing viewport root just defers observer setup to a
//! later `sync`.

use tack_platform::{CalcLength, ElementId, ObservationHost, StyleReader};

use crate::context::ViewportContext;
use crate::dispatch::StickyHandlers;
use crate::error::{Result, TackError};
use crate::geometry::SentinelGeometry;
use crate::observer::{BoundaryObserver, Edge, ObserverHandle};
use crate::transition::StickState;

/// Marker and target handles of a section
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sentinels {
    pub top: ElementId,
    pub bottom: ElementId,
    pub target: ElementId,
}

/// What the renderer needs to place the markers
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SentinelAttachment {
    pub top_marker: Option<ElementId>,
    pub bottom_marker: Option<ElementId>,
    /// Vertical offset of the top marker, once the target has been measured
    pub top_offset: Option<CalcLength>,
    /// Height of the bottom marker, once the target has been measured
    pub bottom_height: Option<CalcLength>,
}

/// One sticky target with its pair of boundary observers
pub struct BoundarySection {
    ctx: ViewportContext,
    handlers: StickyHandlers,
    sentinels: Option<Sentinels>,
    geometry: Option<SentinelGeometry>,
    /// Registry revision the current geometry was measured at
    measured_at: Option<u64>,
    top: Option<ObserverHandle>,
    bottom: Option<ObserverHandle>,
    /// Target the running observers report for
    observed_target: Option<ElementId>,
}

impl BoundarySection {
    pub fn new(ctx: &ViewportContext, handlers: StickyHandlers) -> Self {
        Self {
            ctx: ctx.clone(),
            handlers,
            sentinels: None,
            geometry: None,
            measured_at: None,
            top: None,
            bottom: None,
            observed_target: None,
        }
    }

    /// Marker refs and computed marker geometry
    pub fn attach_sentinels(&self) -> SentinelAttachment {
        SentinelAttachment {
            top_marker: self.sentinels.map(|s| s.top),
            bottom_marker: self.sentinels.map(|s| s.bottom),
            top_offset: self.geometry.map(|g| g.top_offset),
            bottom_height: self.geometry.map(|g| g.bottom_height),
        }
    }

    /// Associate the markers with the sticky target they guard
    ///
    /// If different markers were already being observed, those observations
    /// are dropped at the next [`sync`](Self::sync) in favor of the new ones.
    pub fn register_sticky_ref(&mut self, top: ElementId, bottom: ElementId, target: ElementId) {
        self.ctx.register_sticky_ref(top, bottom, target);
        self.sentinels = Some(Sentinels { top, bottom, target });
    }

    pub fn sentinels(&self) -> Option<Sentinels> {
        self.sentinels
    }

    pub fn geometry(&self) -> Option<SentinelGeometry> {
        self.geometry
    }

    /// Whether both observers are running
    pub fn is_observing(&self) -> bool {
        matches!(
            (&self.top, &self.bottom),
            (Some(top), Some(bottom)) if top.is_active() && bottom.is_active()
        )
    }

    /// Bring measurement and observation up to date
    pub fn sync<H: ObservationHost + StyleReader + ?Sized>(&mut self, host: &mut H) {
        self.refresh_geometry(&*host);

        if let Err(err) = self.ensure_observing(host) {
            tracing::debug!("observer setup deferred: {}", err);
        }
    }

    /// Stop both observers. Safe to call repeatedly or before any `sync`.
    pub fn unmount<H: ObservationHost + ?Sized>(&mut self, host: &mut H) {
        for handle in [self.top.take(), self.bottom.take()].into_iter().flatten() {
            handle.stop(host);
        }
    }

    /// Re-measure when registry membership changed since the last success
    fn refresh_geometry<R: StyleReader + ?Sized>(&mut self, reader: &R) {
        let Some(sentinels) = self.sentinels else {
            return;
        };
        let revision = self.ctx.registry_revision();
        if self.measured_at == Some(revision) {
            return;
        }

        match SentinelGeometry::measure(reader, sentinels.target) {
            Ok(geometry) => {
                tracing::debug!(
                    sticky = sentinels.target.to_raw(),
                    top_offset = %geometry.top_offset,
                    bottom_height = %geometry.bottom_height,
                    "sentinel geometry measured"
                );
                self.geometry = Some(geometry);
                self.measured_at = Some(revision);
            }
            Err(err) => {
                tracing::debug!(
                    sticky = sentinels.target.to_raw(),
                    "keeping previous sentinel geometry: {}",
                    err
                );
            }
        }
    }

    fn ensure_observing<H: ObservationHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        let sentinels = self.sentinels.ok_or(TackError::NoStickyTarget)?;
        let root = self.ctx.require_root()?;

        let current = |handle: &Option<ObserverHandle>, marker: ElementId| {
            handle
                .as_ref()
                .is_some_and(|h| h.is_active() && h.marker() == marker && h.root() == root)
        };
        if current(&self.top, sentinels.top) && current(&self.bottom, sentinels.bottom) {
            return Ok(());
        }

        // Root or markers changed (or this is the first attempt). A restart for
        // the same target resumes where the old observers left off.
        let same_target = self.observed_target == Some(sentinels.target);
        let resume = |handle: &Option<ObserverHandle>| {
            handle
                .as_ref()
                .filter(|_| same_target)
                .map_or(StickState::Unstuck, ObserverHandle::state)
        };
        let (top_state, bottom_state) = (resume(&self.top), resume(&self.bottom));
        self.unmount(host);

        self.ctx.require(sentinels.top)?;
        self.ctx.require(sentinels.bottom)?;

        let top = BoundaryObserver::new(
            Edge::Top,
            sentinels.top,
            self.ctx.clone(),
            self.handlers.clone(),
        )
        .with_state(top_state)
        .start(host, root)?;
        self.top = Some(top);

        let bottom = BoundaryObserver::new(
            Edge::Bottom,
            sentinels.bottom,
            self.ctx.clone(),
            self.handlers.clone(),
        )
        .with_state(bottom_state)
        .start(host, root);
        match bottom {
            Ok(handle) => {
                self.bottom = Some(handle);
                self.observed_target = Some(sentinels.target);
                Ok(())
            }
            Err(err) => {
                self.unmount(host);
                Err(err)
            }
        }
    }
}

impl Drop for BoundarySection {
    fn drop(&mut self) {
        // No host to unobserve with here; silence the callbacks instead
        for handle in [&self.top, &self.bottom].into_iter().flatten() {
            if handle.silence() {
                tracing::debug!(
                    edge = handle.edge().as_str(),
                    "boundary section dropped without unmount"
                );
            }
        }
    }
}
