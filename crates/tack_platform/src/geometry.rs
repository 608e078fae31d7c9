//! Rectangles in viewport coordinates
//!
//! All rectangles handed to observers are bounding rectangles in the same
//! coordinate space as the root's bounding rectangle, with y growing
//! downwards.

/// An axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width (never negative)
    pub width: f32,
    /// Height (never negative)
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from its edges, clamping inverted edges to zero size
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Move the rectangle by the given delta
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Edge-inclusive intersection test
    ///
    /// Rectangles that merely touch intersect, so a zero-height rectangle lying
    /// on another rectangle's edge still counts.
    pub fn touches(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// The overlapping region, if the rectangles touch
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.touches(other) {
            return None;
        }
        Some(Rect::from_edges(
            self.left().max(other.left()),
            self.top().max(other.top()),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        ))
    }

    /// Fraction of this rectangle visible inside `root`, in `0.0..=1.0`
    ///
    /// A zero-area rectangle reports `1.0` when it touches the root and `0.0`
    /// otherwise.
    pub fn intersection_ratio(&self, root: &Rect) -> f32 {
        let Some(visible) = self.intersection(root) else {
            return 0.0;
        };
        let area = self.area();
        if area <= 0.0 || self.is_within(root) {
            return 1.0;
        }
        (visible.area() / area).clamp(0.0, 1.0)
    }

    /// Whether every edge lies inside `outer`, edges included
    pub fn is_within(&self, outer: &Rect) -> bool {
        self.left() >= outer.left()
            && self.right() <= outer.right()
            && self.top() >= outer.top()
            && self.bottom() <= outer.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
    }

    #[test]
    fn test_from_edges_clamps() {
        let r = Rect::from_edges(10.0, 50.0, 5.0, 20.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
    }

    #[test]
    fn test_ratio_fully_inside() {
        let root = Rect::new(0.0, 0.0, 400.0, 600.0);
        let r = Rect::new(0.0, 100.0, 400.0, 120.0);
        assert_eq!(r.intersection_ratio(&root), 1.0);
    }

    #[test]
    fn test_ratio_fully_inside_with_fractional_edges() {
        let root = Rect::new(0.0, 0.0, 400.0, 600.0);
        // Rebuilding these from their edges loses a float step of height
        for i in 0..2000 {
            let r = Rect::new(0.0, 0.1 + i as f32 * 0.137, 400.0, 100.3 + (i % 7) as f32 * 0.19);
            if r.is_within(&root) {
                assert_eq!(r.intersection_ratio(&root), 1.0, "rect {:?}", r);
            }
        }
        let r = Rect::new(0.0, 27.637, 400.0, 100.850006);
        assert!(r.is_within(&root));
        assert_eq!(r.intersection_ratio(&root), 1.0);
    }

    #[test]
    fn test_is_within_is_edge_inclusive() {
        let root = Rect::new(0.0, 0.0, 400.0, 600.0);
        assert!(root.is_within(&root));
        assert!(!Rect::new(0.0, 500.5, 400.0, 100.0).is_within(&root));
    }

    #[test]
    fn test_ratio_half_clipped() {
        let root = Rect::new(0.0, 0.0, 400.0, 600.0);
        let r = Rect::new(0.0, -50.0, 400.0, 100.0);
        assert!((r.intersection_ratio(&root) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ratio_outside() {
        let root = Rect::new(0.0, 0.0, 400.0, 600.0);
        let r = Rect::new(0.0, 700.0, 400.0, 100.0);
        assert_eq!(r.intersection_ratio(&root), 0.0);
    }

    #[test]
    fn test_zero_height_on_edge_is_visible() {
        let root = Rect::new(0.0, 0.0, 400.0, 600.0);
        assert_eq!(Rect::new(0.0, 0.0, 400.0, 0.0).intersection_ratio(&root), 1.0);
        assert_eq!(Rect::new(0.0, 600.0, 400.0, 0.0).intersection_ratio(&root), 1.0);
        assert_eq!(Rect::new(0.0, -0.5, 400.0, 0.0).intersection_ratio(&root), 0.0);
    }
}
