//! # Document Model
//!
//! A document is a flat, ordered list of cells on one fixed page. There is
//! no tree: cells don't nest, and their order only matters to the stacking
//! placement heuristic, never to rendering (cells don't overlap, so there's
//! nothing to z-order).
//!
//! The serialized shape is the one stored documents already use: one flat
//! JSON object per cell with a `type` discriminator, camelCase keys, and
//! optional styling fields that fall back to defaults when absent.

pub mod patch;

use serde::{Deserialize, Serialize};

use crate::layout::Rect;
use crate::style::{Borders, FontWeight, TextAlign, DEFAULT_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};

pub use patch::CellPatch;

/// A document ready for editing: an invoice draft, a template or a saved
/// configuration all share this body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub cells: Vec<Cell>,

    /// Background image reference (data URL or asset URL) drawn under all
    /// cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,

    /// Master switch for cell borders.
    #[serde(default = "default_true")]
    pub show_borders: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            cells: vec![],
            background_image: None,
            show_borders: true,
        }
    }
}

impl Document {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn cell_mut(&mut self, id: &str) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.id == id)
    }

    /// Geometry of every cell, in insertion order.
    pub fn rects(&self) -> Vec<Rect> {
        self.cells.iter().map(|c| c.rect).collect()
    }
}

fn default_true() -> bool {
    true
}

/// A positioned block of text or image on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Stable, unique within its document. Never changes after creation.
    pub id: String,

    /// Position and size in millimeters.
    #[serde(flatten)]
    pub rect: Rect,

    /// Business label of the cell, e.g. "customerName". Required and
    /// expected to be unique within a document (not enforced here).
    pub field_name: String,

    /// Whether the invoice list shows this cell's value as a column.
    #[serde(default)]
    pub show_in_list: bool,

    #[serde(flatten)]
    pub borders: Borders,

    #[serde(flatten)]
    pub content: CellContent,
}

/// The discriminator of [`CellContent`], for places that only care which
/// kind a cell is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Text,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CellContent {
    Text(TextContent),
    Image(ImageContent),
}

impl CellContent {
    pub fn kind(&self) -> CellKind {
        match self {
            CellContent::Text(_) => CellKind::Text,
            CellContent::Image(_) => CellKind::Image,
        }
    }

    /// Fresh content for a kind, used when a cell switches kind.
    pub fn empty(kind: CellKind) -> Self {
        match kind {
            CellKind::Text => CellContent::Text(TextContent::default()),
            CellKind::Image => CellContent::Image(ImageContent::default()),
        }
    }
}

/// Rich text plus the styling applied to the whole block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    /// Opaque markup produced by the host's text editor. Stored and
    /// rendered verbatim.
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_family: default_font_family(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::Normal,
            text_align: TextAlign::Left,
            color: default_color(),
        }
    }
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Where an image cell gets its pixels from.
///
/// Either an inline reference (`imageSrc`, usually a data URL) or a stored
/// asset (`imageAssetId` plus the `imageUrl` it is served from). Setting
/// one clears the other; empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_asset_id: Option<String>,
}

/// A borrowed view of whichever image reference a cell currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    Inline(&'a str),
    Asset { id: Option<&'a str>, url: &'a str },
}

impl ImageRef<'_> {
    /// The string a renderer would put in `src`.
    pub fn src(&self) -> &str {
        match self {
            ImageRef::Inline(src) => src,
            ImageRef::Asset { url, .. } => url,
        }
    }
}

impl ImageContent {
    pub fn set_inline(&mut self, src: String) {
        self.image_src = non_empty(Some(src));
        self.image_url = None;
        self.image_asset_id = None;
    }

    pub fn set_asset(&mut self, asset_id: Option<String>, url: Option<String>) {
        self.image_src = None;
        self.image_asset_id = non_empty(asset_id);
        self.image_url = non_empty(url);
    }

    pub fn reference(&self) -> Option<ImageRef<'_>> {
        fn present(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|s| !s.is_empty())
        }
        if let Some(src) = present(&self.image_src) {
            return Some(ImageRef::Inline(src));
        }
        present(&self.image_url).map(|url| ImageRef::Asset {
            id: present(&self.image_asset_id),
            url,
        })
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

impl Cell {
    /// A text cell with the editor's default styling.
    pub fn new_text(id: impl Into<String>, rect: Rect, field_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rect,
            field_name: field_name.into(),
            show_in_list: false,
            borders: Borders::default(),
            content: CellContent::Text(TextContent::default()),
        }
    }

    pub fn kind(&self) -> CellKind {
        self.content.kind()
    }

    pub fn text(&self) -> Option<&TextContent> {
        match &self.content {
            CellContent::Text(t) => Some(t),
            CellContent::Image(_) => None,
        }
    }

    pub fn image(&self) -> Option<&ImageContent> {
        match &self.content {
            CellContent::Image(i) => Some(i),
            CellContent::Text(_) => None,
        }
    }
}
