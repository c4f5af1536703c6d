//! # Move Resolution: Clamp, Snap, Push
//!
//! Given where the pointer wants a cell to go, decide where it actually
//! goes. Three passes, in order:
//!
//! 1. **Clamp** the proposed origin onto the page.
//! 2. **Snap** edges that land within the tolerance of a neighbor's opposite
//!    edge exactly onto that edge. Rules run per neighbor in collection
//!    order, each against the coordinates left by the previous rule, so when
//!    two rules fire on the same axis the later one wins.
//! 3. **Push** out of any remaining overlap, along the axis with the smaller
//!    overlap, toward the side the gesture came from. Bounded by
//!    `max_iterations` passes over the neighbors; if the bound is hit with
//!    overlap left, the last position is accepted as is.
//!
//! The result is always on the page. It is free of overlap whenever the
//! push loop converges.

use tracing::{debug, trace};

use super::{MmDelta, Page, Rect};
use crate::config::EditorConfig;

/// The outcome of resolving one move proposal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResolution {
    pub x: f64,
    pub y: f64,
    /// Passes of the push loop that ran.
    pub iterations: usize,
    /// False when the push loop gave up with overlap remaining.
    pub converged: bool,
}

#[derive(Debug, Clone)]
pub struct CollisionResolver {
    page: Page,
    snap_tolerance: f64,
    max_iterations: usize,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(Page::A4, &EditorConfig::default())
    }
}

impl CollisionResolver {
    pub fn new(page: Page, config: &EditorConfig) -> Self {
        Self {
            page,
            snap_tolerance: config.snap_tolerance_mm,
            max_iterations: config.max_push_iterations,
        }
    }

    /// Resolve a move of `moving` to `(proposed_x, proposed_y)`.
    ///
    /// `delta` is the total displacement of the gesture so far; its sign on
    /// each axis picks the side a cell is pushed to. `others` must not
    /// contain the moving cell itself.
    pub fn resolve_move(
        &self,
        moving: &Rect,
        proposed_x: f64,
        proposed_y: f64,
        delta: MmDelta,
        others: &[Rect],
    ) -> MoveResolution {
        let (w, h) = (moving.width, moving.height);
        let (x, y) = self.page.clamp_origin(proposed_x, proposed_y, w, h);
        let (x, y) = self.snap(moving.with_origin(x, y), others);
        // A snap target can sit partly off the page.
        let (mut x, mut y) = self.page.clamp_origin(x, y, w, h);

        let mut iterations = 0;
        let mut colliding = true;
        while colliding && iterations < self.max_iterations {
            colliding = false;
            iterations += 1;

            for other in others {
                let current = moving.with_origin(x, y);
                if !current.overlaps(other) {
                    continue;
                }
                colliding = true;

                let (overlap_x, overlap_y) = current.overlap_extent(other);
                if overlap_x < overlap_y {
                    x = if delta.dx > 0.0 {
                        other.x - w
                    } else {
                        other.right()
                    };
                } else {
                    y = if delta.dy > 0.0 {
                        other.y - h
                    } else {
                        other.bottom()
                    };
                }
                (x, y) = self.page.clamp_origin(x, y, w, h);
            }
        }

        let resolved = moving.with_origin(x, y);
        let converged = others.iter().all(|o| !resolved.overlaps(o));
        if !converged {
            debug!(
                x,
                y,
                iterations, "overlap resolution hit its bound; keeping last position"
            );
        }
        trace!(proposed_x, proposed_y, x, y, iterations, "move resolved");

        MoveResolution {
            x,
            y,
            iterations,
            converged,
        }
    }

    fn snap(&self, rect: Rect, others: &[Rect]) -> (f64, f64) {
        let tol = self.snap_tolerance;
        let (w, h) = (rect.width, rect.height);
        let (mut x, mut y) = (rect.x, rect.y);

        for other in others {
            // Left edge onto the neighbor's right edge.
            if (x - other.right()).abs() < tol && rect.with_origin(x, y).spans_overlap_vertically(other) {
                x = other.right();
            }
            // Right edge onto the neighbor's left edge.
            if (x + w - other.x).abs() < tol && rect.with_origin(x, y).spans_overlap_vertically(other) {
                x = other.x - w;
            }
            // Top edge onto the neighbor's bottom edge.
            if (y - other.bottom()).abs() < tol && rect.with_origin(x, y).spans_overlap_horizontally(other) {
                y = other.bottom();
            }
            // Bottom edge onto the neighbor's top edge.
            if (y + h - other.y).abs() < tol && rect.with_origin(x, y).spans_overlap_horizontally(other) {
                y = other.y - h;
            }
        }

        if (x, y) != (rect.x, rect.y) {
            debug!(from_x = rect.x, from_y = rect.y, x, y, "snapped to neighbor edge");
        }
        (x, y)
    }
}
