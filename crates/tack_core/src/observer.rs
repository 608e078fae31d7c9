//! Boundary observers
//!
//! Each boundary section runs two independent observers, one per marker.
//! They share the state machine shape but classify with different predicates
//! and watch at different thresholds:
//!
//! ```text
//!                 Top marker (threshold 0)          Bottom marker (threshold 1)
//! UNSTUCK → STUCK  t.bottom < r.top                  t.bottom > r.top && ratio == 1
//! STUCK → UNSTUCK  r.top <= t.bottom < r.bottom      t.top < r.top && t.bottom < r.bottom
//! ```
//!
//! `t` is the marker's bounding rect and `r` the root's, both taken from the
//! observation entry. Any other entry leaves the state alone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tack_platform::{ElementId, ObservationEntry, ObservationHost, ObserverId, ObserverOptions};

use crate::context::ViewportContext;
use crate::dispatch::StickyHandlers;
use crate::error::Result;
use crate::transition::{StickState, Transition, TransitionKind};

/// Which marker of a boundary section an observer watches
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Marker before the sticky target
    Top,
    /// Spacer marker at the end of the section
    Bottom,
}

impl Edge {
    /// Intersection ratio the host should report crossings of
    pub fn threshold(&self) -> f32 {
        match self {
            Edge::Top => 0.0,
            Edge::Bottom => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        }
    }

    /// Classify `entry` for a marker currently in `state`
    pub fn classify(&self, state: StickState, entry: &ObservationEntry) -> Option<TransitionKind> {
        match self {
            Edge::Top => classify_top(state, entry),
            Edge::Bottom => classify_bottom(state, entry),
        }
    }
}

/// Leading-edge classification
pub fn classify_top(state: StickState, entry: &ObservationEntry) -> Option<TransitionKind> {
    let target = &entry.bounding_rect;
    let root = &entry.root_bounds;
    match state {
        StickState::Unstuck if target.bottom() < root.top() => Some(TransitionKind::Stuck),
        StickState::Stuck if target.bottom() >= root.top() && target.bottom() < root.bottom() => {
            Some(TransitionKind::Unstuck)
        }
        _ => None,
    }
}

/// Trailing-edge classification
pub fn classify_bottom(state: StickState, entry: &ObservationEntry) -> Option<TransitionKind> {
    let target = &entry.bounding_rect;
    let root = &entry.root_bounds;
    match state {
        // The ratio never exceeds 1, so this is the "fully contained" check
        StickState::Unstuck if target.bottom() > root.top() && entry.intersection_ratio >= 1.0 => {
            Some(TransitionKind::Stuck)
        }
        StickState::Stuck if target.top() < root.top() && target.bottom() < root.bottom() => {
            Some(TransitionKind::Unstuck)
        }
        _ => None,
    }
}

/// State machine for one marker, fed by the host's observation batches
pub struct BoundaryObserver {
    edge: Edge,
    marker: ElementId,
    /// Current state, shared with the handle so a restart can resume it
    stuck: Arc<AtomicBool>,
    ctx: ViewportContext,
    handlers: StickyHandlers,
    active: Arc<AtomicBool>,
}

impl BoundaryObserver {
    /// Create an observer for `marker` in the initial UNSTUCK state
    pub fn new(edge: Edge, marker: ElementId, ctx: ViewportContext, handlers: StickyHandlers) -> Self {
        Self {
            edge,
            marker,
            stuck: Arc::new(AtomicBool::new(false)),
            ctx,
            handlers,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn marker(&self) -> ElementId {
        self.marker
    }

    /// Resume from `state` instead of UNSTUCK
    pub fn with_state(self, state: StickState) -> Self {
        self.stuck.store(state == StickState::Stuck, Ordering::SeqCst);
        self
    }

    pub fn state(&self) -> StickState {
        load_state(&self.stuck)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Classify and dispatch every entry of a batch, in delivery order
    pub fn handle_batch(&mut self, entries: &[ObservationEntry]) {
        if !self.is_active() {
            tracing::debug!(
                edge = self.edge.as_str(),
                marker = self.marker.to_raw(),
                entries = entries.len(),
                "ignoring batch for stopped observer"
            );
            return;
        }
        for entry in entries {
            self.handle_entry(entry);
        }
    }

    /// Classify one entry; returns the dispatched transition, if any
    pub fn handle_entry(&mut self, entry: &ObservationEntry) -> Option<Transition> {
        if !self.is_active() || entry.target != self.marker {
            return None;
        }

        let kind = self.edge.classify(self.state(), entry)?;

        tracing::trace!(
            edge = self.edge.as_str(),
            marker = self.marker.to_raw(),
            top = entry.bounding_rect.top(),
            bottom = entry.bounding_rect.bottom(),
            root_top = entry.root_bounds.top(),
            root_bottom = entry.root_bounds.bottom(),
            ratio = entry.intersection_ratio,
            "classified {}",
            kind
        );

        let Some(target) = self.ctx.resolve(self.marker) else {
            tracing::debug!(
                edge = self.edge.as_str(),
                marker = self.marker.to_raw(),
                "dropping {} transition for unregistered marker",
                kind
            );
            return None;
        };

        self.stuck
            .store(StickState::after(kind) == StickState::Stuck, Ordering::SeqCst);
        let transition = Transition { kind, target };

        tracing::debug!(
            edge = self.edge.as_str(),
            sticky = target.to_raw(),
            "sticky target {}",
            kind
        );
        self.handlers.dispatch(&transition);
        Some(transition)
    }

    /// Hand the observer to the host, watching its marker against `root`
    pub fn start<H: ObservationHost + ?Sized>(
        mut self,
        host: &mut H,
        root: ElementId,
    ) -> Result<ObserverHandle> {
        let edge = self.edge;
        let marker = self.marker;
        let active = self.active.clone();
        let stuck = self.stuck.clone();
        active.store(true, Ordering::SeqCst);

        let id = host.observe(
            marker,
            ObserverOptions::new(root, edge.threshold()),
            Box::new(move |entries: &[ObservationEntry]| self.handle_batch(entries)),
        )?;

        tracing::debug!(
            edge = edge.as_str(),
            marker = marker.to_raw(),
            root = root.to_raw(),
            "observer started"
        );

        Ok(ObserverHandle {
            id,
            edge,
            marker,
            root,
            active,
            stuck,
        })
    }
}

/// A running observation owned by a boundary section
#[derive(Debug)]
pub struct ObserverHandle {
    id: ObserverId,
    edge: Edge,
    marker: ElementId,
    root: ElementId,
    active: Arc<AtomicBool>,
    stuck: Arc<AtomicBool>,
}

fn load_state(stuck: &AtomicBool) -> StickState {
    if stuck.load(Ordering::SeqCst) {
        StickState::Stuck
    } else {
        StickState::Unstuck
    }
}

impl ObserverHandle {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn marker(&self) -> ElementId {
        self.marker
    }

    /// The root this observation measures against
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Last state reached by the observer
    pub fn state(&self) -> StickState {
        load_state(&self.stuck)
    }

    /// Stop dispatching without telling the host; returns whether it was active
    pub(crate) fn silence(&self) -> bool {
        self.active.swap(false, Ordering::SeqCst)
    }

    /// Stop observing; repeated calls do nothing
    ///
    /// The observer is marked inactive before the host is asked to unobserve,
    /// so batches the host already queued are ignored.
    pub fn stop<H: ObservationHost + ?Sized>(&self, host: &mut H) {
        if self.silence() {
            host.unobserve(self.id);
            tracing::debug!(
                edge = self.edge.as_str(),
                marker = self.marker.to_raw(),
                "observer stopped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::sync::Mutex;
    use tack_platform::Rect;

    const ROOT: Rect = Rect::new(0.0, 0.0, 400.0, 600.0);

    fn elements(n: usize) -> Vec<ElementId> {
        let mut arena: SlotMap<ElementId, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    fn entry(marker: ElementId, y: f32, height: f32) -> ObservationEntry {
        let rect = Rect::new(0.0, y, 400.0, height);
        ObservationEntry {
            target: marker,
            bounding_rect: rect,
            root_bounds: ROOT,
            intersection_ratio: rect.intersection_ratio(&ROOT),
        }
    }

    struct Fixture {
        marker: ElementId,
        target: ElementId,
        ctx: ViewportContext,
        log: Arc<Mutex<Vec<Transition>>>,
    }

    impl Fixture {
        fn new() -> Self {
            let ids = elements(3);
            let ctx = ViewportContext::new();
            ctx.register_sticky_ref(ids[0], ids[1], ids[2]);
            Self {
                marker: ids[0],
                target: ids[2],
                ctx,
                log: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn observer(&self, edge: Edge) -> BoundaryObserver {
            let log = self.log.clone();
            let handlers = StickyHandlers::new().on_change(move |t| log.lock().unwrap().push(*t));
            BoundaryObserver::new(edge, self.marker, self.ctx.clone(), handlers)
        }

        fn kinds(&self) -> Vec<TransitionKind> {
            self.log.lock().unwrap().iter().map(|t| t.kind).collect()
        }
    }

    fn fx_entry(fx: &Fixture, y: f32) -> ObservationEntry {
        entry(fx.marker, y, 0.0)
    }

    #[test]
    fn test_top_sticks_above_root() {
        let fx = Fixture::new();
        let mut observer = fx.observer(Edge::Top);

        // Entering from below and sitting inside the root is not a transition
        observer.handle_batch(&[fx_entry(&fx, 650.0), fx_entry(&fx, 300.0), fx_entry(&fx, 0.0)]);
        assert!(fx.kinds().is_empty());

        observer.handle_batch(&[fx_entry(&fx, -10.0)]);
        assert_eq!(fx.kinds(), vec![TransitionKind::Stuck]);
        assert_eq!(observer.state(), StickState::Stuck);
        assert_eq!(fx.log.lock().unwrap()[0].target, fx.target);
    }

    #[test]
    fn test_top_unsticks_inside_band() {
        let fx = Fixture::new();
        let mut observer = fx.observer(Edge::Top);

        observer.handle_batch(&[fx_entry(&fx, -5.0)]);
        // Still above: no second stuck
        observer.handle_batch(&[fx_entry(&fx, -50.0)]);
        // Bottom exactly at root.top counts as back in the band
        observer.handle_batch(&[fx_entry(&fx, 0.0)]);

        assert_eq!(fx.kinds(), vec![TransitionKind::Stuck, TransitionKind::Unstuck]);
    }

    #[test]
    fn test_top_does_not_unstick_below_root() {
        let fx = Fixture::new();
        let mut observer = fx.observer(Edge::Top);

        observer.handle_batch(&[fx_entry(&fx, -5.0)]);
        // Jumped past the whole viewport: bottom == root.bottom is outside [top, bottom)
        observer.handle_batch(&[fx_entry(&fx, 600.0)]);

        assert_eq!(fx.kinds(), vec![TransitionKind::Stuck]);
    }

    #[test]
    fn test_bottom_needs_full_containment() {
        let fx = Fixture::new();
        let mut observer = fx.observer(Edge::Bottom);

        // Partially visible from below
        observer.handle_entry(&entry(fx.marker, 550.0, 120.0));
        assert!(fx.kinds().is_empty());

        // Fully visible
        observer.handle_entry(&entry(fx.marker, 400.0, 120.0));
        assert_eq!(fx.kinds(), vec![TransitionKind::Stuck]);
    }

    #[test]
    fn test_bottom_unsticks_when_leaving_top() {
        let fx = Fixture::new();
        let mut observer = fx.observer(Edge::Bottom);

        observer.handle_entry(&entry(fx.marker, 100.0, 120.0));
        observer.handle_entry(&entry(fx.marker, -20.0, 120.0));

        assert_eq!(fx.kinds(), vec![TransitionKind::Stuck, TransitionKind::Unstuck]);
        assert_eq!(observer.state(), StickState::Unstuck);
    }

    #[test]
    fn test_bottom_ignores_exit_while_unstuck() {
        let fx = Fixture::new();
        let mut observer = fx.observer(Edge::Bottom);

        observer.handle_entry(&entry(fx.marker, -20.0, 120.0));
        assert!(fx.kinds().is_empty());
    }

    #[test]
    fn test_unregistered_marker_is_dropped() {
        let ids = elements(1);
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let handlers = StickyHandlers::new().on_change(move |t| log_clone.lock().unwrap().push(*t));
        let mut observer = BoundaryObserver::new(Edge::Top, ids[0], ViewportContext::new(), handlers);

        assert_eq!(observer.handle_entry(&entry(ids[0], -10.0, 0.0)), None);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(observer.state(), StickState::Unstuck);
    }

    #[test]
    fn test_foreign_entries_are_ignored() {
        let fx = Fixture::new();
        let other = elements(2)[1];
        let mut observer = fx.observer(Edge::Top);

        observer.handle_batch(&[entry(other, -10.0, 0.0)]);
        assert!(fx.kinds().is_empty());
    }

    #[test]
    fn test_resumed_observer_does_not_repeat_stuck() {
        let fx = Fixture::new();
        let mut observer = fx.observer(Edge::Top).with_state(StickState::Stuck);
        assert_eq!(observer.state(), StickState::Stuck);

        observer.handle_batch(&[fx_entry(&fx, -10.0), fx_entry(&fx, 20.0)]);
        assert_eq!(fx.kinds(), vec![TransitionKind::Unstuck]);
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(Edge::Top.threshold(), 0.0);
        assert_eq!(Edge::Bottom.threshold(), 1.0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn assert_alternates(kinds: &[TransitionKind]) -> std::result::Result<(), TestCaseError> {
            for (i, kind) in kinds.iter().enumerate() {
                let expected = if i % 2 == 0 {
                    TransitionKind::Stuck
                } else {
                    TransitionKind::Unstuck
                };
                prop_assert_eq!(*kind, expected);
            }
            Ok(())
        }

        proptest! {
            #[test]
            fn top_transitions_alternate(positions in prop::collection::vec(-800.0f32..1400.0, 0..60)) {
                let fx = Fixture::new();
                let mut observer = fx.observer(Edge::Top);
                for y in positions {
                    observer.handle_batch(&[entry(fx.marker, y, 0.0)]);
                }
                assert_alternates(&fx.kinds())?;
            }

            #[test]
            fn bottom_transitions_alternate(positions in prop::collection::vec(-800.0f32..1400.0, 0..60)) {
                let fx = Fixture::new();
                let mut observer = fx.observer(Edge::Bottom);
                for y in positions {
                    observer.handle_batch(&[entry(fx.marker, y, 120.0)]);
                }
                assert_alternates(&fx.kinds())?;
            }

            #[test]
            fn top_stuck_iff_above_root(y in -800.0f32..1400.0) {
                let e = entry(elements(1)[0], y, 0.0);
                let stuck = classify_top(StickState::Unstuck, &e) == Some(TransitionKind::Stuck);
                prop_assert_eq!(stuck, e.bounding_rect.bottom() < ROOT.top());

                let unstuck = classify_top(StickState::Stuck, &e) == Some(TransitionKind::Unstuck);
                let bottom = e.bounding_rect.bottom();
                prop_assert_eq!(unstuck, bottom >= ROOT.top() && bottom < ROOT.bottom());
            }

            #[test]
            fn bottom_predicates(y in -800.0f32..1400.0, height in 0.0f32..900.0) {
                let e = entry(elements(1)[0], y, height);
                let rect = e.bounding_rect;

                let stuck = classify_bottom(StickState::Unstuck, &e) == Some(TransitionKind::Stuck);
                prop_assert_eq!(stuck, e.intersection_ratio == 1.0 && rect.bottom() > ROOT.top());

                let unstuck = classify_bottom(StickState::Stuck, &e) == Some(TransitionKind::Unstuck);
                prop_assert_eq!(unstuck, rect.top() < ROOT.top() && rect.bottom() < ROOT.bottom());
            }
        }
    }
}
