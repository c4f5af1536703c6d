//! # Fixed-Page Layout Engine
//!
//! Everything here works in millimeters on a single A4 page. There is no
//! scrolling canvas and no second page: a cell is either on the page or it
//! gets clamped back onto it.
//!
//! ## Pieces
//!
//! ```text
//! pointer delta (px)
//!       ↓
//!   [units]     : screen pixels → page millimeters
//!       ↓
//!   [collision] : clamp, snap to neighbor edges, push out of overlaps
//!   [resize]    : clamp width/height between a minimum and the page edge
//!       ↓
//!   updated cell rect
//!
//!   [placement] : where a newly added / inserted cell goes
//! ```
//!
//! All functions in this module are pure. They take rectangles and return
//! rectangles; the interaction layer decides which cell the result lands in.

pub mod collision;
pub mod placement;
pub mod units;

use serde::{Deserialize, Serialize};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// An axis-aligned rectangle in page millimeters, origin at top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn with_origin(&self, x: f64, y: f64) -> Self {
        Self { x, y, ..*self }
    }

    /// Vertical extents intersect (edges touching doesn't count).
    pub fn spans_overlap_vertically(&self, other: &Rect) -> bool {
        self.y < other.bottom() && self.bottom() > other.y
    }

    /// Horizontal extents intersect (edges touching doesn't count).
    pub fn spans_overlap_horizontally(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }

    /// Do the two rectangles share any area? Shared edges are not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || self.x >= other.right()
            || self.bottom() <= other.y
            || self.y >= other.bottom())
    }

    /// Width and height of the intersection. Only meaningful when
    /// [`overlaps`](Rect::overlaps) is true.
    pub fn overlap_extent(&self, other: &Rect) -> (f64, f64) {
        let dx = self.right().min(other.right()) - self.x.max(other.x);
        let dy = self.bottom().min(other.bottom()) - self.y.max(other.y);
        (dx, dy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// The fixed page every geometry computation is bounded by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub width: f64,
    pub height: f64,
}

impl Page {
    /// ISO A4 portrait.
    pub const A4: Page = Page {
        width: PAGE_WIDTH_MM,
        height: PAGE_HEIGHT_MM,
    };

    pub fn full_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Largest x a rect of `width` may take and still fit.
    pub fn max_x(&self, width: f64) -> f64 {
        (self.width - width).max(0.0)
    }

    /// Largest y a rect of `height` may take and still fit.
    pub fn max_y(&self, height: f64) -> f64 {
        (self.height - height).max(0.0)
    }

    /// Clamp an origin so a rect of the given size stays on the page.
    pub fn clamp_origin(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        (
            x.max(0.0).min(self.max_x(width)),
            y.max(0.0).min(self.max_y(height)),
        )
    }

    /// Shrink a rect to at most the page size, then slide it onto the page.
    pub fn fit(&self, rect: &Rect) -> Rect {
        let width = rect.width.clamp(0.0, self.width);
        let height = rect.height.clamp(0.0, self.height);
        let (x, y) = self.clamp_origin(rect.x, rect.y, width, height);
        Rect::new(x, y, width, height)
    }

    pub fn contains(&self, rect: &Rect) -> bool {
        rect.x >= 0.0 && rect.y >= 0.0 && rect.right() <= self.width && rect.bottom() <= self.height
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::A4
    }
}

/// A displacement in page millimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MmDelta {
    pub dx: f64,
    pub dy: f64,
}

impl MmDelta {
    pub const ZERO: MmDelta = MmDelta { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Which edge of a reference cell a new cell is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

/// New size for a cell being resized from its bottom-right handle.
///
/// Width and height are clamped independently to
/// `[min_size, page_edge - anchor_origin]`. The origin never moves and no
/// sibling cells are consulted, so a resize may overlap a neighbor.
pub fn resize_clamped(anchor: &Rect, delta: MmDelta, min_size: f64, page: &Page) -> Rect {
    let max_width = (page.width - anchor.x).max(min_size);
    let max_height = (page.height - anchor.y).max(min_size);
    Rect {
        width: (anchor.width + delta.dx).max(min_size).min(max_width),
        height: (anchor.height + delta.dy).max(min_size).min(max_height),
        ..*anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(50.0, 0.0, 50.0, 50.0);
        let c = Rect::new(0.0, 50.0, 50.0, 50.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_overlap_extent() {
        let a = Rect::new(0.0, 0.0, 50.0, 40.0);
        let b = Rect::new(45.0, 10.0, 50.0, 50.0);
        assert!(a.overlaps(&b));
        assert_eq!(a.overlap_extent(&b), (5.0, 30.0));
    }

    #[test]
    fn test_clamp_origin_keeps_rect_on_page() {
        let page = Page::A4;
        assert_eq!(page.clamp_origin(-5.0, 400.0, 100.0, 50.0), (0.0, 247.0));
        assert_eq!(page.clamp_origin(150.0, 10.0, 100.0, 50.0), (110.0, 10.0));
    }

    #[test]
    fn test_clamp_origin_oversized_rect_pins_to_zero() {
        assert_eq!(Page::A4.clamp_origin(30.0, 30.0, 300.0, 400.0), (0.0, 0.0));
    }

    #[test]
    fn test_fit_slides_overhanging_rect_back() {
        let fitted = Page::A4.fit(&Rect::new(190.0, 10.0, 40.0, 80.0));
        assert_eq!(fitted, Rect::new(170.0, 10.0, 40.0, 80.0));
        let fitted = Page::A4.fit(&Rect::new(-5.0, 0.0, 500.0, 80.0));
        assert_eq!(fitted, Rect::new(0.0, 0.0, 210.0, 80.0));
    }

    #[test]
    fn test_resize_grows_and_clamps_to_page() {
        let anchor = Rect::new(100.0, 200.0, 50.0, 50.0);
        let r = resize_clamped(&anchor, MmDelta::new(500.0, 500.0), 10.0, &Page::A4);
        assert_eq!(r, Rect::new(100.0, 200.0, 110.0, 97.0));
    }

    #[test]
    fn test_resize_never_below_minimum() {
        let anchor = Rect::new(10.0, 10.0, 50.0, 50.0);
        let r = resize_clamped(&anchor, MmDelta::new(-100.0, -45.0), 10.0, &Page::A4);
        assert_eq!((r.width, r.height), (10.0, 10.0));
    }

    #[test]
    fn test_resize_axes_are_independent() {
        let anchor = Rect::new(0.0, 0.0, 50.0, 50.0);
        let r = resize_clamped(&anchor, MmDelta::new(20.0, -60.0), 10.0, &Page::A4);
        assert_eq!((r.width, r.height), (70.0, 10.0));
    }
}
