//! Headless host
//!
//! An in-memory document with one scroll container. Elements are laid out in
//! content coordinates; the root shows the slice of content between
//! `scroll_y` and `scroll_y + viewport.height`. Intersection observation
//! follows the platform primitive's contract:
//!
//! - the first frame after `observe` always delivers the current state
//! - afterwards an observer is notified only when its intersecting flag or
//!   threshold index changed since its last delivery
//! - notifications of one frame are delivered in document order

use slotmap::SlotMap;
use tack_platform::{
    BatchCallback, BoxMetrics, ElementId, ObservationEntry, ObservationHost, ObserverId,
    ObserverOptions, PlatformError, Rect, Result, StyleReader,
};

struct Node {
    /// Layout rect in content coordinates (root: unused)
    rect: Rect,
    metrics: BoxMetrics,
    attached: bool,
    /// Document order
    order: u64,
}

/// Which side of each threshold the observed element was on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Crossing {
    intersecting: bool,
    threshold_index: usize,
}

impl Crossing {
    fn of(entry: &ObservationEntry, thresholds: &[f32]) -> Self {
        let intersecting = entry.is_intersecting();
        let threshold_index = if intersecting {
            thresholds
                .iter()
                .filter(|&&t| entry.intersection_ratio >= t)
                .count()
        } else {
            0
        };
        Self {
            intersecting,
            threshold_index,
        }
    }
}

struct Registration {
    target: ElementId,
    options: ObserverOptions,
    callback: BatchCallback,
    last: Option<Crossing>,
}

/// A simulated document with a single vertically scrolling root
pub struct HeadlessHost {
    elements: SlotMap<ElementId, Node>,
    observers: SlotMap<ObserverId, Registration>,
    root: ElementId,
    viewport: Rect,
    scroll_y: f32,
    next_order: u64,
    frames: u64,
}

impl HeadlessHost {
    /// Create a document whose root occupies `viewport` on screen
    pub fn new(viewport: Rect) -> Self {
        let mut elements = SlotMap::with_key();
        let root = elements.insert(Node {
            rect: viewport,
            metrics: BoxMetrics::with_height(tack_platform::Length::Px(viewport.height)),
            attached: true,
            order: 0,
        });
        Self {
            elements,
            observers: SlotMap::with_key(),
            root,
            viewport,
            scroll_y: 0.0,
            next_order: 1,
            frames: 0,
        }
    }

    /// The scroll container
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Add an attached element at `rect` (content coordinates)
    pub fn insert(&mut self, rect: Rect) -> ElementId {
        self.insert_with(rect, BoxMetrics::default(), true)
    }

    /// Add an attached element with computed box metrics
    pub fn insert_styled(&mut self, rect: Rect, metrics: BoxMetrics) -> ElementId {
        self.insert_with(rect, metrics, true)
    }

    /// Add an element that is not yet part of the document
    pub fn insert_detached(&mut self, rect: Rect, metrics: BoxMetrics) -> ElementId {
        self.insert_with(rect, metrics, false)
    }

    fn insert_with(&mut self, rect: Rect, metrics: BoxMetrics, attached: bool) -> ElementId {
        let order = self.next_order;
        self.next_order += 1;
        self.elements.insert(Node {
            rect,
            metrics,
            attached,
            order,
        })
    }

    /// Remove an element; observers of it stop receiving entries
    pub fn remove(&mut self, element: ElementId) {
        if element != self.root {
            self.elements.remove(element);
        }
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.elements.contains_key(element)
    }

    fn node_mut(&mut self, element: ElementId) -> Result<&mut Node> {
        self.elements
            .get_mut(element)
            .ok_or(PlatformError::UnknownElement(element))
    }

    /// Move or resize an element
    pub fn set_rect(&mut self, element: ElementId, rect: Rect) -> Result<()> {
        self.node_mut(element)?.rect = rect;
        Ok(())
    }

    /// Layout rect in content coordinates
    pub fn layout_rect(&self, element: ElementId) -> Result<Rect> {
        self.elements
            .get(element)
            .map(|node| node.rect)
            .ok_or(PlatformError::UnknownElement(element))
    }

    pub fn set_metrics(&mut self, element: ElementId, metrics: BoxMetrics) -> Result<()> {
        self.node_mut(element)?.metrics = metrics;
        Ok(())
    }

    pub fn set_attached(&mut self, element: ElementId, attached: bool) -> Result<()> {
        self.node_mut(element)?.attached = attached;
        Ok(())
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Scroll the root so that content offset `y` sits at its top edge
    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y;
    }

    pub fn scroll_by(&mut self, dy: f32) {
        self.scroll_y += dy;
    }

    /// Bottom edge of the lowest attached element
    pub fn content_height(&self) -> f32 {
        self.elements
            .iter()
            .filter(|(id, node)| *id != self.root && node.attached)
            .map(|(_, node)| node.rect.bottom())
            .fold(0.0, f32::max)
    }

    /// Current bounding rectangle in screen coordinates
    pub fn bounding_rect(&self, element: ElementId) -> Result<Rect> {
        if element == self.root {
            return Ok(self.viewport);
        }
        let node = self
            .elements
            .get(element)
            .ok_or(PlatformError::UnknownElement(element))?;
        Ok(node
            .rect
            .translate(self.viewport.x, self.viewport.y - self.scroll_y))
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn entry_for(&self, target: ElementId, root: ElementId) -> Option<ObservationEntry> {
        let node = self.elements.get(target)?;
        if !node.attached {
            return None;
        }
        let bounding_rect = self.bounding_rect(target).ok()?;
        let root_bounds = self.bounding_rect(root).ok()?;
        Some(ObservationEntry {
            target,
            bounding_rect,
            root_bounds,
            intersection_ratio: bounding_rect.intersection_ratio(&root_bounds),
        })
    }

    /// Compute intersections and deliver this frame's batches
    ///
    /// Returns the number of batches delivered.
    pub fn run_frame(&mut self) -> usize {
        self.frames += 1;

        let mut pending: Vec<(u64, ObserverId, ObservationEntry)> = Vec::new();
        for (id, registration) in self.observers.iter() {
            let Some(entry) = self.entry_for(registration.target, registration.options.root) else {
                continue;
            };
            let crossing = Crossing::of(&entry, &registration.options.thresholds);
            if registration.last != Some(crossing) {
                let order = self.elements[registration.target].order;
                pending.push((order, id, entry));
            }
        }
        pending.sort_by_key(|(order, _, _)| *order);

        let mut delivered = 0;
        for (_, id, entry) in pending {
            if let Some(registration) = self.observers.get_mut(id) {
                registration.last = Some(Crossing::of(&entry, &registration.options.thresholds));
                (registration.callback)(&[entry]);
                delivered += 1;
            }
        }

        if delivered > 0 {
            tracing::trace!(frame = self.frames, batches = delivered, "frame delivered");
        }
        delivered
    }
}

impl ObservationHost for HeadlessHost {
    fn observe(
        &mut self,
        target: ElementId,
        options: ObserverOptions,
        callback: BatchCallback,
    ) -> Result<ObserverId> {
        if !self.elements.contains_key(target) {
            return Err(PlatformError::UnknownElement(target));
        }
        if !self.elements.contains_key(options.root) {
            return Err(PlatformError::UnknownElement(options.root));
        }
        if options.thresholds.is_empty() {
            return Err(PlatformError::NoThresholds);
        }
        Ok(self.observers.insert(Registration {
            target,
            options,
            callback,
            last: None,
        }))
    }

    fn unobserve(&mut self, observer: ObserverId) {
        self.observers.remove(observer);
    }
}

impl StyleReader for HeadlessHost {
    fn box_metrics(&self, element: ElementId) -> Result<BoxMetrics> {
        let node = self
            .elements
            .get(element)
            .ok_or(PlatformError::UnknownElement(element))?;
        if !node.attached {
            return Err(PlatformError::Detached(element));
        }
        Ok(node.metrics)
    }
}
