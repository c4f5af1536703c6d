//! The invoice list: one row per invoice, one column per listed field.
//!
//! A cell shows up as a column when it has `showInList` set and a field
//! name. Columns are the union of those names across all invoices, in the
//! order first seen. An invoice without a given field shows `-`. Every row
//! also carries the invoice's creation date.

use std::fmt;

use chrono::{DateTime, Utc};
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

use crate::model::{Cell, CellContent};
use crate::store::Invoice;

/// Placeholder for a column the invoice has no listed cell for.
pub const MISSING_VALUE: &str = "-";
/// What an image cell with a picture shows in the list.
pub const IMAGE_VALUE: &str = "[Image]";

/// Cells that appear as list columns.
pub fn list_fields(cells: &[Cell]) -> impl Iterator<Item = &Cell> {
    cells
        .iter()
        .filter(|c| c.show_in_list && !c.field_name.is_empty())
}

/// The text a cell contributes to the list.
pub fn cell_plain_value(cell: &Cell) -> String {
    match &cell.content {
        CellContent::Text(text) => markup_to_plain_text(&text.content),
        CellContent::Image(image) => {
            if image.reference().is_some() {
                IMAGE_VALUE.to_string()
            } else {
                String::new()
            }
        }
    }
}

/// Concatenated text nodes of a markup fragment.
///
/// Editor output is HTML, not XML: unclosed `<br>` tags and HTML-only
/// entities like `&nbsp;` are normal. Entities resolve against the HTML5
/// table and mismatched end tags are tolerated. A text node with an entity
/// outside that table is kept raw. Markup the reader can't parse at all is
/// stripped of anything between `<` and `>`.
pub fn markup_to_plain_text(markup: &str) -> String {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().check_end_names = false;

    let mut out = String::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(text)) => match text.unescape_with(resolve_html5_entity) {
                Ok(unescaped) => out.push_str(&unescaped),
                Err(_) => out.push_str(&String::from_utf8_lossy(&text)),
            },
            Ok(Event::CData(data)) => out.push_str(&String::from_utf8_lossy(&data)),
            Ok(Event::Eof) => break,
            Err(_) => return strip_tags(markup),
            _ => {}
        }
        buf.clear();
    }
    out
}

fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Union of list field names across invoices, first-seen order.
pub fn list_columns(invoices: &[&Invoice]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for invoice in invoices {
        for cell in list_fields(&invoice.document.cells) {
            if !columns.iter().any(|c| c == &cell.field_name) {
                columns.push(cell.field_name.clone());
            }
        }
    }
    columns
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub invoice_id: String,
    pub invoice_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// One entry per column of the owning [`InvoiceSummary`].
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

/// One row per invoice, in the order given.
pub fn summary_rows(invoices: &[&Invoice]) -> InvoiceSummary {
    let columns = list_columns(invoices);
    let rows = invoices
        .iter()
        .map(|invoice| SummaryRow {
            invoice_id: invoice.id.clone(),
            invoice_number: invoice.invoice_number,
            created_at: invoice.created_at,
            values: columns
                .iter()
                .map(|column| {
                    list_fields(&invoice.document.cells)
                        .find(|c| &c.field_name == column)
                        .map_or_else(|| MISSING_VALUE.to_string(), cell_plain_value)
                })
                .collect(),
        })
        .collect();
    InvoiceSummary { columns, rows }
}

impl fmt::Display for InvoiceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invoice #\tDate")?;
        for column in &self.columns {
            write!(f, "\t{}", column)?;
        }
        writeln!(f)?;
        for row in &self.rows {
            match row.created_at {
                Some(created) => write!(f, "{}\t{}", row.invoice_number, created.format("%Y-%m-%d"))?,
                None => write!(f, "{}\t{}", row.invoice_number, MISSING_VALUE)?,
            }
            for value in &row.values {
                write!(f, "\t{}", value.replace(['\t', '\n'], " "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
