use wasm_bindgen::prelude::*;

use crate::editor::Editor;
use crate::interaction::{GestureOutcome, InputEvent};
use crate::layout::Direction;
use crate::model::{CellPatch, Document};

fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/// An editing session driven from the browser.
///
/// The host hit-tests its own DOM and forwards pointer events as plain
/// objects, e.g. `{ kind: "pointerDown", cellId, part: "body",
/// button: "primary", position: { x, y } }`.
#[wasm_bindgen]
pub struct WasmEditor {
    inner: Editor,
}

#[wasm_bindgen]
impl WasmEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(document_json: &str) -> Result<WasmEditor, JsValue> {
        let document = if document_json.trim().is_empty() {
            Document::default()
        } else {
            Document::from_json(document_json).map_err(js_error)?
        };
        Ok(WasmEditor {
            inner: Editor::new(document),
        })
    }

    /// The whole document in its persisted shape.
    pub fn document(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.document()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = selectedId)]
    pub fn selected_id(&self) -> Option<String> {
        self.inner.selected().map(|c| c.id.clone())
    }

    pub fn select(&mut self, cell_id: Option<String>) {
        self.inner.select(cell_id.as_deref());
    }

    /// Returns the new cell's id.
    #[wasm_bindgen(js_name = addCell)]
    pub fn add_cell(&mut self) -> String {
        self.inner.add_cell().id.clone()
    }

    /// `direction` is one of `top`, `bottom`, `left`, `right`.
    #[wasm_bindgen(js_name = insertAdjacent)]
    pub fn insert_adjacent(&mut self, cell_id: &str, direction: JsValue) -> Result<String, JsValue> {
        let direction: Direction = serde_wasm_bindgen::from_value(direction).map_err(js_error)?;
        let cell = self
            .inner
            .insert_adjacent(cell_id, direction)
            .map_err(js_error)?;
        Ok(cell.id.clone())
    }

    #[wasm_bindgen(js_name = updateCell)]
    pub fn update_cell(&mut self, cell_id: &str, patch: JsValue) -> Result<(), JsValue> {
        let patch: CellPatch = serde_wasm_bindgen::from_value(patch).map_err(js_error)?;
        self.inner.update_cell(cell_id, &patch).map_err(js_error)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = deleteCell)]
    pub fn delete_cell(&mut self, cell_id: &str) -> Result<(), JsValue> {
        self.inner.delete_cell(cell_id).map_err(js_error)?;
        Ok(())
    }

    /// Feed one pointer event. Returns true when a cell's geometry changed
    /// and the host should re-render it.
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&mut self, event: JsValue) -> Result<bool, JsValue> {
        let event: InputEvent = serde_wasm_bindgen::from_value(event).map_err(js_error)?;
        Ok(matches!(
            self.inner.handle(&event),
            GestureOutcome::Updated { .. }
        ))
    }

    #[wasm_bindgen(js_name = printHtml)]
    pub fn print_html(&self) -> String {
        crate::print::render_print_html(self.inner.document())
    }
}
