//! Numbered invoices.
//!
//! Invoice numbers are unique. Creating without a number takes the highest
//! existing number plus one, starting at 10000. Updates never renumber.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Record, Records, StoreError};
use crate::error::Result;
use crate::model::Document;

/// The first number handed out when no invoice has one yet.
pub const FIRST_INVOICE_NUMBER: u64 = 10000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: u64,
    #[serde(flatten)]
    pub document: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    #[serde(default)]
    pub save_as_template: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_id: Option<String>,
    /// `None` on records saved before timestamps were kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Invoice {
    const KIND: &'static str = "Invoice";

    fn id(&self) -> &str {
        &self.id
    }
}

/// What the editor submits on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    /// Ignored on update. Zero counts as "not given".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<u64>,
    #[serde(flatten)]
    pub document: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    #[serde(default)]
    pub save_as_template: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_id: Option<String>,
}

impl InvoiceDraft {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceStore {
    records: Records<Invoice>,
}

impl InvoiceStore {
    pub fn create(&mut self, draft: InvoiceDraft) -> Result<&Invoice> {
        let invoice_number = match draft.invoice_number.filter(|&n| n != 0) {
            Some(n) if !self.is_invoice_number_available(n, None) => {
                warn!(invoice_number = n, "duplicate invoice number rejected");
                return Err(StoreError::DuplicateInvoiceNumber(n).into());
            }
            Some(n) => n,
            None => self.next_invoice_number(),
        };

        let id = self.records.allocate_id();
        let now = Utc::now();
        info!(%id, invoice_number, "invoice created");
        Ok(self.records.insert(Invoice {
            id,
            invoice_number,
            document: draft.document,
            template_id: draft.template_id,
            template_name: draft.template_name,
            save_as_template: draft.save_as_template,
            configuration_id: draft.configuration_id,
            created_at: Some(now),
            updated_at: Some(now),
        }))
    }

    pub fn get(&self, id: &str) -> Result<&Invoice> {
        Ok(self.records.get(id)?)
    }

    /// Replace the document and template fields. The number, template id
    /// and configuration id stay as they were.
    pub fn update(&mut self, id: &str, draft: InvoiceDraft) -> Result<&Invoice> {
        let invoice = self.records.get_mut(id)?;
        invoice.document = draft.document;
        invoice.template_name = draft.template_name;
        invoice.save_as_template = draft.save_as_template;
        invoice.updated_at = Some(Utc::now());
        info!(id, invoice_number = invoice.invoice_number, "invoice updated");
        Ok(invoice)
    }

    pub fn delete(&mut self, id: &str) -> Result<Invoice> {
        let invoice = self.records.remove(id)?;
        info!(id, invoice_number = invoice.invoice_number, "invoice deleted");
        Ok(invoice)
    }

    pub fn list(&self) -> impl Iterator<Item = &Invoice> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The number a create without one would receive.
    pub fn next_invoice_number(&self) -> u64 {
        self.records
            .iter()
            .map(|inv| inv.invoice_number)
            .max()
            .map_or(FIRST_INVOICE_NUMBER, |n| n + 1)
    }

    /// Is `number` free, ignoring the invoice `excluding_id` (the one being
    /// edited)?
    pub fn is_invoice_number_available(&self, number: u64, excluding_id: Option<&str>) -> bool {
        !self
            .records
            .iter()
            .any(|inv| inv.invoice_number == number && Some(inv.id.as_str()) != excluding_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CanvasError;
    use crate::layout::Rect;
    use crate::model::Cell;

    fn numbered(n: u64) -> InvoiceDraft {
        InvoiceDraft {
            invoice_number: Some(n),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_invoice_gets_10000() {
        let mut store = InvoiceStore::default();
        assert_eq!(store.create(InvoiceDraft::default()).unwrap().invoice_number, 10000);
        assert_eq!(store.create(InvoiceDraft::default()).unwrap().invoice_number, 10001);
    }

    #[test]
    fn test_auto_number_follows_max() {
        let mut store = InvoiceStore::default();
        store.create(numbered(20500)).unwrap();
        store.create(numbered(12)).unwrap();
        assert_eq!(store.next_invoice_number(), 20501);
        assert_eq!(store.create(InvoiceDraft::default()).unwrap().invoice_number, 20501);
    }

    #[test]
    fn test_duplicate_number_rejected() {
        let mut store = InvoiceStore::default();
        store.create(numbered(10010)).unwrap();
        let err = store.create(numbered(10010)).unwrap_err();
        assert!(matches!(
            err,
            CanvasError::Store(StoreError::DuplicateInvoiceNumber(10010))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_zero_number_means_auto() {
        let mut store = InvoiceStore::default();
        assert_eq!(store.create(numbered(0)).unwrap().invoice_number, 10000);
    }

    #[test]
    fn test_update_keeps_number() {
        let mut store = InvoiceStore::default();
        let id = store.create(numbered(10100)).unwrap().id.clone();
        let mut draft = numbered(99);
        draft.document.cells.push(Cell::new_text("cell-1", Rect::new(0.0, 0.0, 10.0, 10.0), "f"));
        draft.template_name = Some("Basic".into());
        let updated = store.update(&id, draft).unwrap();
        assert_eq!(updated.invoice_number, 10100);
        assert_eq!(updated.document.cells.len(), 1);
        assert_eq!(updated.template_name.as_deref(), Some("Basic"));
    }

    #[test]
    fn test_create_and_update_stamp_times() {
        let mut store = InvoiceStore::default();
        let created = store.create(InvoiceDraft::default()).unwrap().clone();
        let created_at = created.created_at.unwrap();
        assert_eq!(created.updated_at, Some(created_at));

        let updated = store.update(&created.id, InvoiceDraft::default()).unwrap();
        assert_eq!(updated.created_at, Some(created_at));
        assert!(updated.updated_at.unwrap() >= created_at);
    }

    #[test]
    fn test_missing_timestamps_load_as_none() {
        let invoice: Invoice = serde_json::from_value(serde_json::json!({
            "id": "000000000000000000000001",
            "invoiceNumber": 10000,
            "cells": []
        }))
        .unwrap();
        assert_eq!(invoice.created_at, None);
        assert!(serde_json::to_value(&invoice).unwrap().get("createdAt").is_none());
    }

    #[test]
    fn test_number_availability_excludes_self() {
        let mut store = InvoiceStore::default();
        let id = store.create(numbered(10000)).unwrap().id.clone();
        assert!(!store.is_invoice_number_available(10000, None));
        assert!(store.is_invoice_number_available(10000, Some(&id)));
        assert!(store.is_invoice_number_available(10001, None));
    }

    #[test]
    fn test_delete_returns_record() {
        let mut store = InvoiceStore::default();
        let id = store.create(InvoiceDraft::default()).unwrap().id.clone();
        let removed = store.delete(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(store.is_empty());
        assert!(matches!(
            store.get(&id),
            Err(CanvasError::Store(StoreError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_invoice_json_is_flat() {
        let mut store = InvoiceStore::default();
        let invoice = store.create(InvoiceDraft::default()).unwrap();
        let value = serde_json::to_value(invoice).unwrap();
        assert_eq!(value["invoiceNumber"], 10000);
        assert_eq!(value["showBorders"], true);
        assert!(value["cells"].as_array().unwrap().is_empty());
        assert!(value["createdAt"].is_string());
    }
}
