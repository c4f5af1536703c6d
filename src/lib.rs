//! # Invoice Canvas
//!
//! The layout core of an invoice editor.
//!
//! An invoice is a set of rectangular cells, text or image, placed freely on
//! one A4 page. The user drags and resizes them with a pointer; the engine
//! keeps every cell on the page, snaps edges onto neighbors, and pushes a
//! moved cell back out of anything it landed on. There is no flow layout
//! and no second page: **a cell is where the user put it, or as close as
//! the page allows.**
//!
//! ## Architecture
//!
//! ```text
//! pointer events (host UI)
//!       ↓
//!   [interaction] : press / move / release state machine
//!       ↓
//!   [layout]      : px→mm, clamp, snap, push, resize, placement
//!       ↓
//!   [model]       : Document, Cell, typed CellPatch updates
//!       ↓
//!   [editor]      : one editing session: commands + selection
//!
//!   [store]       : invoices, templates, configurations, image assets
//!   [summary]     : invoice list columns and rows
//!   [print]       : standalone printable HTML
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod print;
pub mod store;
pub mod style;
pub mod summary;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::EditorConfig;
pub use editor::Editor;
pub use error::{CanvasError, Result};
pub use model::{Cell, CellPatch, Document};

/// Load a document from its persisted JSON shape.
pub fn parse_document(json: &str) -> Result<Document> {
    Document::from_json(json)
}

/// Render a document given as JSON to printable HTML.
pub fn render_print_json(json: &str) -> Result<String> {
    let document = parse_document(json)?;
    Ok(print::render_print_html(&document))
}
