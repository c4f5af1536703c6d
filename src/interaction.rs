//! # Drag & Resize State Machine
//!
//! Turns a stream of pointer events into geometry updates for one cell at
//! a time.
//!
//! ```text
//!            press (primary) on body/handle
//!   Idle ───────────────────────────────────▶ Dragging{cell, mode, anchors}
//!    ▲                                            │   ▲
//!    │            release (anywhere)              │   │ move
//!    └────────────────────────────────────────────┘───┘
//! ```
//!
//! # Invariants
//!
//! 1. Every update is computed from the anchors captured at press time, never
//!    from the previous move, so rounding doesn't accumulate across a drag.
//! 2. A release always returns to `Idle`. There is no other way out.
//! 3. A release with no intervening move leaves the cell untouched.
//! 4. Moves are collision-resolved; resizes are only clamped (they may
//!    overlap a neighbor).
//!
//! # Failure Modes
//!
//! - A move reported with an unusable surface size is dropped.
//! - A cell deleted mid-gesture turns the remaining moves into no-ops.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::EditorConfig;
use crate::layout::collision::CollisionResolver;
use crate::layout::units::{pixel_delta_to_mm, RenderedSurface, ScreenPoint};
use crate::layout::{resize_clamped, Page, Rect};
use crate::model::Cell;

/// Which pointer button an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// The part of a cell a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellPart {
    Body,
    ResizeHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureMode {
    Move,
    Resize,
}

impl From<CellPart> for GestureMode {
    fn from(part: CellPart) -> Self {
        match part {
            CellPart::Body => GestureMode::Move,
            CellPart::ResizeHandle => GestureMode::Resize,
        }
    }
}

/// Pointer input, already hit-tested by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InputEvent {
    #[serde(rename_all = "camelCase")]
    PointerDown {
        cell_id: String,
        part: CellPart,
        button: PointerButton,
        position: ScreenPoint,
    },
    /// The surface is the page's rendered size at the time of the move.
    PointerMove {
        position: ScreenPoint,
        surface: RenderedSurface,
    },
    PointerUp {
        position: ScreenPoint,
    },
}

/// Everything captured when a gesture starts.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub cell_id: String,
    pub mode: GestureMode,
    pub anchor_pointer: ScreenPoint,
    pub anchor_rect: Rect,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// What a single event did.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Nothing changed.
    Ignored,
    /// A gesture began on this cell.
    Started { cell_id: String, mode: GestureMode },
    /// The cell's geometry was replaced.
    Updated { cell_id: String, rect: Rect },
    /// The gesture ended.
    Ended { cell_id: String },
}

/// The gesture state plus the machinery to resolve each move.
#[derive(Debug, Clone)]
pub struct Interaction {
    state: GestureState,
    page: Page,
    resolver: CollisionResolver,
    min_size: f64,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(Page::A4, &EditorConfig::default())
    }
}

impl Interaction {
    pub fn new(page: Page, config: &EditorConfig) -> Self {
        Self {
            state: GestureState::Idle,
            page,
            resolver: CollisionResolver::new(page, config),
            min_size: config.min_cell_size_mm,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    /// Feed one event. `cells` is the collection the gesture operates on.
    pub fn handle(&mut self, event: &InputEvent, cells: &mut [Cell]) -> GestureOutcome {
        match event {
            InputEvent::PointerDown {
                cell_id,
                part,
                button,
                position,
            } => self.on_down(cell_id, *part, *button, *position, cells),
            InputEvent::PointerMove { position, surface } => {
                self.on_move(*position, *surface, cells)
            }
            InputEvent::PointerUp { .. } => self.on_up(),
        }
    }

    fn on_down(
        &mut self,
        cell_id: &str,
        part: CellPart,
        button: PointerButton,
        position: ScreenPoint,
        cells: &[Cell],
    ) -> GestureOutcome {
        if button != PointerButton::Primary {
            return GestureOutcome::Ignored;
        }
        let Some(cell) = cells.iter().find(|c| c.id == cell_id) else {
            return GestureOutcome::Ignored;
        };

        let mode = GestureMode::from(part);
        debug!(cell_id, ?mode, "gesture started");
        self.state = GestureState::Dragging(DragSession {
            cell_id: cell_id.to_string(),
            mode,
            anchor_pointer: position,
            anchor_rect: cell.rect,
        });
        GestureOutcome::Started {
            cell_id: cell_id.to_string(),
            mode,
        }
    }

    fn on_move(
        &mut self,
        position: ScreenPoint,
        surface: RenderedSurface,
        cells: &mut [Cell],
    ) -> GestureOutcome {
        let GestureState::Dragging(session) = &self.state else {
            return GestureOutcome::Ignored;
        };
        if !surface.is_usable() {
            trace!(?surface, "move dropped: surface has no size");
            return GestureOutcome::Ignored;
        }

        let delta = pixel_delta_to_mm(
            position.x - session.anchor_pointer.x,
            position.y - session.anchor_pointer.y,
            surface,
            &self.page,
        );

        let Some(index) = cells.iter().position(|c| c.id == session.cell_id) else {
            return GestureOutcome::Ignored;
        };

        let rect = match session.mode {
            GestureMode::Move => {
                let others: Vec<Rect> = cells
                    .iter()
                    .filter(|c| c.id != session.cell_id)
                    .map(|c| c.rect)
                    .collect();
                let current = cells[index].rect;
                let resolved = self.resolver.resolve_move(
                    &current,
                    session.anchor_rect.x + delta.dx,
                    session.anchor_rect.y + delta.dy,
                    delta,
                    &others,
                );
                current.with_origin(resolved.x, resolved.y)
            }
            GestureMode::Resize => {
                resize_clamped(&session.anchor_rect, delta, self.min_size, &self.page)
            }
        };

        cells[index].rect = rect;
        GestureOutcome::Updated {
            cell_id: session.cell_id.clone(),
            rect,
        }
    }

    fn on_up(&mut self) -> GestureOutcome {
        match std::mem::take(&mut self.state) {
            GestureState::Dragging(session) => {
                debug!(cell_id = %session.cell_id, "gesture ended");
                GestureOutcome::Ended {
                    cell_id: session.cell_id,
                }
            }
            GestureState::Idle => GestureOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One pixel per millimeter keeps the arithmetic readable.
    const SURFACE: RenderedSurface = RenderedSurface {
        width_px: 210.0,
        height_px: 297.0,
    };

    fn cells() -> Vec<Cell> {
        vec![
            Cell::new_text("a", Rect::new(0.0, 0.0, 50.0, 50.0), "A"),
            Cell::new_text("b", Rect::new(100.0, 0.0, 50.0, 50.0), "B"),
        ]
    }

    fn down(cell_id: &str, part: CellPart, x: f64, y: f64) -> InputEvent {
        InputEvent::PointerDown {
            cell_id: cell_id.to_string(),
            part,
            button: PointerButton::Primary,
            position: ScreenPoint::new(x, y),
        }
    }

    fn move_to(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMove {
            position: ScreenPoint::new(x, y),
            surface: SURFACE,
        }
    }

    fn up() -> InputEvent {
        InputEvent::PointerUp {
            position: ScreenPoint::default(),
        }
    }

    #[test]
    fn test_press_starts_and_release_ends() {
        let mut cells = cells();
        let mut ix = Interaction::default();
        assert_eq!(
            ix.handle(&down("a", CellPart::Body, 10.0, 10.0), &mut cells),
            GestureOutcome::Started {
                cell_id: "a".into(),
                mode: GestureMode::Move
            }
        );
        assert!(ix.is_dragging());
        assert_eq!(
            ix.handle(&up(), &mut cells),
            GestureOutcome::Ended { cell_id: "a".into() }
        );
        assert_eq!(ix.state(), &GestureState::Idle);
    }

    #[test]
    fn test_secondary_button_does_not_start() {
        let mut cells = cells();
        let mut ix = Interaction::default();
        let event = InputEvent::PointerDown {
            cell_id: "a".into(),
            part: CellPart::Body,
            button: PointerButton::Secondary,
            position: ScreenPoint::new(0.0, 0.0),
        };
        assert_eq!(ix.handle(&event, &mut cells), GestureOutcome::Ignored);
        assert!(!ix.is_dragging());
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut cells = cells();
        let before = cells.clone();
        let mut ix = Interaction::default();
        assert_eq!(ix.handle(&move_to(50.0, 50.0), &mut cells), GestureOutcome::Ignored);
        assert_eq!(cells, before);
    }

    #[test]
    fn test_move_is_relative_to_anchor() {
        let mut cells = cells();
        let mut ix = Interaction::default();
        ix.handle(&down("a", CellPart::Body, 20.0, 20.0), &mut cells);
        ix.handle(&move_to(25.0, 100.0), &mut cells);
        ix.handle(&move_to(30.0, 120.0), &mut cells);
        assert_eq!(cells[0].rect, Rect::new(10.0, 100.0, 50.0, 50.0));
    }

    #[test]
    fn test_move_into_neighbor_is_pushed_out() {
        let mut cells = cells();
        let mut ix = Interaction::default();
        ix.handle(&down("a", CellPart::Body, 0.0, 0.0), &mut cells);
        ix.handle(&move_to(70.0, 0.0), &mut cells);
        assert_eq!(cells[0].rect.x, 50.0);
        assert!(!cells[0].rect.overlaps(&cells[1].rect));
    }

    #[test]
    fn test_resize_clamps_and_may_overlap() {
        let mut cells = cells();
        let mut ix = Interaction::default();
        ix.handle(&down("a", CellPart::ResizeHandle, 50.0, 50.0), &mut cells);
        let outcome = ix.handle(&move_to(130.0, 60.0), &mut cells);
        assert_eq!(
            outcome,
            GestureOutcome::Updated {
                cell_id: "a".into(),
                rect: Rect::new(0.0, 0.0, 130.0, 60.0)
            }
        );
        assert!(cells[0].rect.overlaps(&cells[1].rect));
    }

    #[test]
    fn test_unusable_surface_drops_move() {
        let mut cells = cells();
        let before = cells.clone();
        let mut ix = Interaction::default();
        ix.handle(&down("a", CellPart::Body, 0.0, 0.0), &mut cells);
        let event = InputEvent::PointerMove {
            position: ScreenPoint::new(30.0, 30.0),
            surface: RenderedSurface::new(0.0, 0.0),
        };
        assert_eq!(ix.handle(&event, &mut cells), GestureOutcome::Ignored);
        assert_eq!(cells, before);
        assert!(ix.is_dragging());
    }

    #[test]
    fn test_release_without_move_is_identity() {
        let mut cells = cells();
        let before = cells.clone();
        let mut ix = Interaction::default();
        ix.handle(&down("b", CellPart::ResizeHandle, 5.0, 5.0), &mut cells);
        ix.handle(&up(), &mut cells);
        assert_eq!(cells, before);
    }

    #[test]
    fn test_unknown_cell_press_is_ignored() {
        let mut cells = cells();
        let mut ix = Interaction::default();
        assert_eq!(
            ix.handle(&down("zzz", CellPart::Body, 0.0, 0.0), &mut cells),
            GestureOutcome::Ignored
        );
    }

    #[test]
    fn test_event_json_shape() {
        let event: InputEvent = serde_json::from_str(
            r#"{"kind":"pointerMove","position":{"x":1,"y":2},"surface":{"widthPx":794,"heightPx":1123}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            InputEvent::PointerMove {
                position: ScreenPoint::new(1.0, 2.0),
                surface: RenderedSurface::new(794.0, 1123.0),
            }
        );
    }
}
