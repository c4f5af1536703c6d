//! Standalone HTML for printing a document.
//!
//! This mirrors the editor's on-screen styling closely enough to print:
//! an A4 box with the background image, and each cell absolutely
//! positioned in millimeters. Text markup is emitted as-is since it came
//! from the editor's own text surface.

use std::fmt::Write;

use v_htmlescape::escape;

use crate::layout::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::model::{Cell, CellContent, Document};
use crate::style::Color;

const BORDER: &str = "1px solid black";

const STYLE: &str = "\
@page { size: A4; margin: 0; }
body { margin: 0; padding: 0; }
.a4-container { position: relative; background: white; background-size: cover; background-position: center; background-repeat: no-repeat; }
.invoice-cell { position: absolute; display: flex; align-items: center; justify-content: center; overflow: hidden; padding: 8px; box-sizing: border-box; }
.cell-text { width: 100%; height: 100%; white-space: pre-wrap; }
.cell-image { max-width: 100%; max-height: 100%; object-fit: contain; }
";

/// Render `document` as a complete HTML page.
pub fn render_print_html(document: &Document) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Print Invoice</title>\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");

    let _ = write!(
        html,
        "<div class=\"a4-container\" style=\"width: {}mm; height: {}mm;",
        PAGE_WIDTH_MM, PAGE_HEIGHT_MM
    );
    if let Some(bg) = document.background_image.as_deref().filter(|bg| !bg.is_empty()) {
        let _ = write!(html, " background-image: url('{}');", escape(bg));
    }
    html.push_str("\">\n");

    for cell in &document.cells {
        write_cell(&mut html, cell, document.show_borders);
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn write_cell(html: &mut String, cell: &Cell, show_borders: bool) {
    let side = |on: bool| if show_borders && on { BORDER } else { "none" };
    let _ = write!(
        html,
        "<div class=\"invoice-cell\" data-field=\"{}\" style=\"left: {}mm; top: {}mm; width: {}mm; height: {}mm; \
         border-top: {}; border-right: {}; border-bottom: {}; border-left: {};",
        escape(&cell.field_name),
        cell.rect.x,
        cell.rect.y,
        cell.rect.width,
        cell.rect.height,
        side(cell.borders.top),
        side(cell.borders.right),
        side(cell.borders.bottom),
        side(cell.borders.left),
    );

    match &cell.content {
        CellContent::Text(text) => {
            let color = Color::parse_hex(&text.color).unwrap_or_default();
            let _ = write!(
                html,
                " font-size: {}px; color: {}; font-family: {}; font-weight: {}; text-align: {};\">",
                text.font_size,
                color.to_hex(),
                escape(&text.font_family),
                text.font_weight.as_css(),
                text.text_align.as_css(),
            );
            let _ = write!(html, "<div class=\"cell-text\">{}</div>", text.content);
        }
        CellContent::Image(image) => {
            html.push_str("\">");
            if let Some(reference) = image.reference() {
                let _ = write!(
                    html,
                    "<img class=\"cell-image\" src=\"{}\" alt=\"{}\">",
                    escape(reference.src()),
                    escape(&cell.field_name)
                );
            }
        }
    }
    html.push_str("</div>\n");
}
