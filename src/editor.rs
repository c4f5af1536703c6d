//! The editing session for one document.
//!
//! [`Editor`] owns the document, the current selection and the in-progress
//! gesture, and is the only thing that mutates cells. Hosts call the
//! command methods for menu/toolbar actions and [`Editor::handle`] for
//! pointer input.

use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::error::{CanvasError, Result};
use crate::interaction::{GestureOutcome, InputEvent, Interaction};
use crate::layout::placement::PlacementPlanner;
use crate::layout::{Direction, Page, Rect};
use crate::model::{Cell, CellPatch, Document};

#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    selected: Option<String>,
    interaction: Interaction,
    planner: PlacementPlanner,
    config: EditorConfig,
    page: Page,
    next_id: u64,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Self::with_config(document, EditorConfig::default())
    }

    pub fn with_config(document: Document, config: EditorConfig) -> Self {
        let page = Page::A4;
        Self {
            document,
            selected: None,
            interaction: Interaction::new(page, &config),
            planner: PlacementPlanner::new(page, &config),
            config,
            page,
            next_id: 1,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn cells(&self) -> &[Cell] {
        &self.document.cells
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<&Cell> {
        self.selected.as_deref().and_then(|id| self.document.cell(id))
    }

    /// Select a cell, or clear the selection with `None`. Selecting an id
    /// that doesn't exist clears it too.
    pub fn select(&mut self, cell_id: Option<&str>) {
        self.selected = cell_id
            .filter(|id| self.document.cell(id).is_some())
            .map(str::to_string);
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    /// Append a text cell at the default stacking position.
    pub fn add_cell(&mut self) -> &Cell {
        let rect = self.planner.next_default_rect(&self.document.rects());
        self.push_new_cell(rect)
    }

    /// Append a text cell glued to one side of an existing cell.
    pub fn insert_adjacent(&mut self, reference_id: &str, direction: Direction) -> Result<&Cell> {
        let reference = self
            .document
            .cell(reference_id)
            .ok_or_else(|| CanvasError::UnknownCell(reference_id.to_string()))?;
        let rect = self.planner.insert_adjacent(&reference.rect, direction);
        Ok(self.push_new_cell(rect))
    }

    pub fn update_cell(&mut self, cell_id: &str, patch: &CellPatch) -> Result<&Cell> {
        let page = self.page;
        let min_size = self.config.min_cell_size_mm;
        let cell = self
            .document
            .cell_mut(cell_id)
            .ok_or_else(|| CanvasError::UnknownCell(cell_id.to_string()))?;
        cell.apply_patch(patch, &page, min_size)?;
        debug!(cell_id, "cell updated");
        Ok(cell)
    }

    /// Remove a cell, clearing the selection if it pointed at it.
    pub fn delete_cell(&mut self, cell_id: &str) -> Result<Cell> {
        let index = self
            .document
            .cells
            .iter()
            .position(|c| c.id == cell_id)
            .ok_or_else(|| CanvasError::UnknownCell(cell_id.to_string()))?;
        let removed = self.document.cells.remove(index);
        if self.selected.as_deref() == Some(cell_id) {
            self.selected = None;
        }
        info!(cell_id, "cell deleted");
        Ok(removed)
    }

    /// Feed one pointer event. Pressing on a cell also selects it.
    pub fn handle(&mut self, event: &InputEvent) -> GestureOutcome {
        let outcome = self.interaction.handle(event, &mut self.document.cells);
        if let GestureOutcome::Started { cell_id, .. } = &outcome {
            self.selected = Some(cell_id.clone());
        }
        outcome
    }

    fn push_new_cell(&mut self, rect: Rect) -> &Cell {
        let id = self.fresh_id();
        let field_name = format!("Field {}", self.document.cells.len() + 1);
        let rect = self.page.fit(&rect);
        info!(cell_id = %id, x = rect.x, y = rect.y, width = rect.width, height = rect.height, "cell added");
        self.document.cells.push(Cell::new_text(id, rect, field_name));
        &self.document.cells[self.document.cells.len() - 1]
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = format!("cell-{}", self.next_id);
            self.next_id += 1;
            if self.document.cell(&id).is_none() {
                return id;
            }
        }
    }
}
