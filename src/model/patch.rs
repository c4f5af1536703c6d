//! Typed property updates.
//!
//! A [`CellPatch`] names the subset of fields to change. Unknown keys are
//! rejected when the patch is parsed, and fields that don't belong to the
//! cell's kind are rejected when it is applied. A patch is validated as a
//! whole before any field is written, so a rejected patch leaves the cell
//! untouched.

use serde::{Deserialize, Serialize};

use super::{Cell, CellContent, CellKind};
use crate::error::{CanvasError, Result};
use crate::layout::{Page, Rect};
use crate::style::{Color, FontWeight, TextAlign};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CellPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CellKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_list: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_top: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_right: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_left: Option<bool>,

    // Text cells only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    // Image cells only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_asset_id: Option<String>,
}

impl CellPatch {
    /// Parse a patch, rejecting keys that aren't cell properties (including
    /// `id`, which never changes).
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CanvasError::InvalidPatch(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| CanvasError::InvalidPatch(e.to_string()))
    }

    fn touches_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }

    fn text_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            ("content", self.content.is_some()),
            ("fontFamily", self.font_family.is_some()),
            ("fontSize", self.font_size.is_some()),
            ("fontWeight", self.font_weight.is_some()),
            ("textAlign", self.text_align.is_some()),
            ("color", self.color.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
    }

    fn image_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            ("imageSrc", self.image_src.is_some()),
            ("imageUrl", self.image_url.is_some()),
            ("imageAssetId", self.image_asset_id.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
    }

    fn validate(&self, target: CellKind) -> Result<()> {
        let invalid = |msg: String| Err(CanvasError::InvalidPatch(msg));

        let misplaced = match target {
            CellKind::Text => self.image_fields().next(),
            CellKind::Image => self.text_fields().next(),
        };
        if let Some(field) = misplaced {
            let kind = match target {
                CellKind::Text => "text",
                CellKind::Image => "image",
            };
            return invalid(format!("`{}` does not apply to {} cells", field, kind));
        }

        for (name, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return invalid(format!("`{}` must be a finite number", name));
                }
            }
        }

        if let Some(name) = &self.field_name {
            if name.trim().is_empty() {
                return invalid("`fieldName` must not be empty".to_string());
            }
        }
        if self.font_size == Some(0) {
            return invalid("`fontSize` must be positive".to_string());
        }
        if let Some(color) = &self.color {
            if Color::parse_hex(color).is_none() {
                return invalid(format!("`color` must be a hex color, got '{}'", color));
            }
        }
        Ok(())
    }
}

impl Cell {
    /// Apply a property update.
    ///
    /// Geometry edits are kept on the page: width and height are clamped to
    /// `[min_size, page]` and the origin slid so the cell fits.
    pub fn apply_patch(&mut self, patch: &CellPatch, page: &Page, min_size: f64) -> Result<()> {
        let target = patch.kind.unwrap_or(self.kind());
        patch.validate(target)?;

        if target != self.kind() {
            self.content = CellContent::empty(target);
        }

        if patch.touches_geometry() {
            let proposed = Rect::new(
                patch.x.unwrap_or(self.rect.x),
                patch.y.unwrap_or(self.rect.y),
                patch.width.unwrap_or(self.rect.width),
                patch.height.unwrap_or(self.rect.height),
            );
            let width = proposed.width.max(min_size).min(page.width);
            let height = proposed.height.max(min_size).min(page.height);
            let (x, y) = page.clamp_origin(proposed.x, proposed.y, width, height);
            self.rect = Rect::new(x, y, width, height);
        }

        if let Some(name) = &patch.field_name {
            self.field_name = name.clone();
        }
        if let Some(v) = patch.show_in_list {
            self.show_in_list = v;
        }
        if let Some(v) = patch.border_top {
            self.borders.top = v;
        }
        if let Some(v) = patch.border_right {
            self.borders.right = v;
        }
        if let Some(v) = patch.border_bottom {
            self.borders.bottom = v;
        }
        if let Some(v) = patch.border_left {
            self.borders.left = v;
        }

        match &mut self.content {
            CellContent::Text(text) => {
                if let Some(v) = &patch.content {
                    text.content = v.clone();
                }
                if let Some(v) = &patch.font_family {
                    text.font_family = v.clone();
                }
                if let Some(v) = patch.font_size {
                    text.font_size = v;
                }
                if let Some(v) = patch.font_weight {
                    text.font_weight = v;
                }
                if let Some(v) = patch.text_align {
                    text.text_align = v;
                }
                if let Some(v) = &patch.color {
                    text.color = v.clone();
                }
            }
            CellContent::Image(image) => {
                if let Some(src) = &patch.image_src {
                    image.set_inline(src.clone());
                }
                if patch.image_asset_id.is_some() || patch.image_url.is_some() {
                    image.set_asset(patch.image_asset_id.clone(), patch.image_url.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_cell() -> Cell {
        Cell::new_text("cell-1", Rect::new(10.0, 10.0, 50.0, 30.0), "Field 1")
    }

    fn apply(cell: &mut Cell, patch: serde_json::Value) -> Result<()> {
        let patch = CellPatch::from_value(patch)?;
        cell.apply_patch(&patch, &Page::A4, 10.0)
    }

    #[test]
    fn test_unknown_field_rejected_at_parse() {
        let err = CellPatch::from_json(r#"{"fontSize": 12, "shadow": true}"#).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidPatch(_)));
        assert!(err.to_string().contains("shadow"));
    }

    #[test]
    fn test_id_is_not_patchable() {
        assert!(CellPatch::from_json(r#"{"id": "other"}"#).is_err());
    }

    #[test]
    fn test_text_style_update() {
        let mut cell = text_cell();
        apply(
            &mut cell,
            json!({"fontSize": 18, "fontWeight": "bold", "textAlign": "right", "color": "#336699"}),
        )
        .unwrap();
        let text = cell.text().unwrap();
        assert_eq!(text.font_size, 18);
        assert_eq!(text.font_weight, FontWeight::Bold);
        assert_eq!(text.text_align, TextAlign::Right);
        assert_eq!(text.color, "#336699");
    }

    #[test]
    fn test_image_field_on_text_cell_rejected() {
        let mut cell = text_cell();
        let before = cell.clone();
        let err = apply(&mut cell, json!({"fieldName": "logo", "imageSrc": "data:x"})).unwrap_err();
        assert!(err.to_string().contains("imageSrc"));
        assert_eq!(cell, before);
    }

    #[test]
    fn test_kind_switch_then_image_fields_allowed() {
        let mut cell = text_cell();
        apply(&mut cell, json!({"type": "image", "imageSrc": "data:image/png;base64,AAAA"})).unwrap();
        assert_eq!(cell.kind(), CellKind::Image);
        assert_eq!(
            cell.image().unwrap().image_src.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[test]
    fn test_text_field_after_switch_to_image_rejected() {
        let mut cell = text_cell();
        assert!(apply(&mut cell, json!({"type": "image", "fontSize": 12})).is_err());
        assert_eq!(cell.kind(), CellKind::Text);
    }

    #[test]
    fn test_asset_reference_replaces_inline() {
        let mut cell = text_cell();
        apply(&mut cell, json!({"type": "image", "imageSrc": "data:a"})).unwrap();
        apply(&mut cell, json!({"imageAssetId": "abc", "imageUrl": "/assets/abc", "imageSrc": ""})).unwrap();
        let image = cell.image().unwrap();
        assert_eq!(image.image_src, None);
        assert_eq!(image.image_asset_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_geometry_patch_is_kept_on_page() {
        let mut cell = text_cell();
        apply(&mut cell, json!({"x": 200.0, "width": 50.0})).unwrap();
        assert_eq!(cell.rect, Rect::new(160.0, 10.0, 50.0, 30.0));

        apply(&mut cell, json!({"height": 2.0})).unwrap();
        assert_eq!(cell.rect.height, 10.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut cell = text_cell();
        assert!(apply(&mut cell, json!({"fieldName": "  "})).is_err());
        assert!(apply(&mut cell, json!({"fontSize": 0})).is_err());
        assert!(apply(&mut cell, json!({"color": "red"})).is_err());
        let nan = CellPatch {
            x: Some(f64::NAN),
            ..Default::default()
        };
        assert!(cell.apply_patch(&nan, &Page::A4, 10.0).is_err());
    }

    #[test]
    fn test_borders_and_list_flag() {
        let mut cell = text_cell();
        apply(
            &mut cell,
            json!({"borderTop": false, "borderBottom": true, "showInList": true}),
        )
        .unwrap();
        assert!(!cell.borders.top);
        assert!(cell.borders.bottom);
        assert!(cell.show_in_list);
    }
}
