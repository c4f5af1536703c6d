//! Default rectangles for new cells.
//!
//! Two heuristics, neither of which checks for collisions:
//!
//! - **Stacking**: a new cell takes the full-width strip below the last cell
//!   in insertion order. Once the last cell reaches the bottom of the page,
//!   new cells become full-height columns to the right of everything.
//! - **Directional insert**: a fixed-size band glued to one edge of an
//!   existing cell. Only clamped to non-negative coordinates, so it can
//!   overlap other cells.

use super::{Direction, Page, Rect};
use crate::config::EditorConfig;

#[derive(Debug, Clone)]
pub struct PlacementPlanner {
    page: Page,
    band_height: f64,
    band_width: f64,
}

impl Default for PlacementPlanner {
    fn default() -> Self {
        Self::new(Page::A4, &EditorConfig::default())
    }
}

impl PlacementPlanner {
    pub fn new(page: Page, config: &EditorConfig) -> Self {
        Self {
            page,
            band_height: config.insert_band_height_mm,
            band_width: config.insert_band_width_mm,
        }
    }

    /// The rectangle for a cell appended with no other hint, given the
    /// existing cells in insertion order.
    pub fn next_default_rect(&self, existing: &[Rect]) -> Rect {
        let Some(last) = existing.last() else {
            return self.page.full_rect();
        };

        let y = last.bottom();
        if y < self.page.height {
            return Rect::new(0.0, y, self.page.width, self.page.height - y);
        }

        let rightmost = existing
            .iter()
            .map(Rect::right)
            .fold(f64::NEG_INFINITY, f64::max);
        Rect::new(rightmost, 0.0, self.page.width - rightmost, self.page.height)
    }

    /// The rectangle for a cell attached to `direction` of `reference`.
    pub fn insert_adjacent(&self, reference: &Rect, direction: Direction) -> Rect {
        match direction {
            Direction::Top => Rect::new(
                reference.x,
                (reference.y - self.band_height).max(0.0),
                reference.width,
                self.band_height,
            ),
            Direction::Bottom => Rect::new(
                reference.x,
                reference.bottom(),
                reference.width,
                self.band_height,
            ),
            Direction::Left => Rect::new(
                (reference.x - self.band_width).max(0.0),
                reference.y,
                self.band_width,
                reference.height,
            ),
            Direction::Right => Rect::new(
                reference.right(),
                reference.y,
                self.band_width,
                reference.height,
            ),
        }
    }
}
