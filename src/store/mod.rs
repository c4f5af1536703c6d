//! # Persistence Collaborators
//!
//! In-memory stores for everything the editor saves: invoices, reusable
//! templates, named configurations, uploaded image assets and the image
//! library. Together they form a [`Workspace`], which the CLI reads and
//! writes as one JSON file.
//!
//! ```text
//! Workspace
//!   ├── invoices       : numbered documents (auto-increment from 10000)
//!   ├── templates      : named documents to start an invoice from
//!   ├── configurations : named documents, one may be primary
//!   ├── assets         : content-hash-deduplicated data URLs
//!   └── library        : named, categorized images
//! ```
//!
//! Every record gets a 24-character lowercase hex id on creation. Lookups
//! validate the id shape before searching, so a malformed id and a missing
//! record are different errors. Listings are newest first.

pub mod assets;
pub mod documents;
pub mod invoices;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;

pub use assets::{AssetStore, ImageAsset, ImageLibrary, LibraryImage, LibraryImageSummary, NewLibraryImage};
pub use documents::{Configuration, ConfigurationStore, NamedDocument, Template, TemplateStore};
pub use invoices::{Invoice, InvoiceDraft, InvoiceStore};

/// Why a store refused an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invalid {kind} id '{id}'")]
    InvalidId { kind: &'static str, id: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Invoice number {0} already exists. Please use a different number.")]
    DuplicateInvoiceNumber(u64),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
}

/// Something a [`Records`] collection can hold.
pub trait Record {
    /// Human-readable kind used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Is `id` shaped like a record id (24 hex digits)?
pub fn is_valid_id(id: &str) -> bool {
    id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// An insertion-ordered collection with its own id sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Records<T> {
    #[serde(default)]
    next_id: u64,
    #[serde(default = "Vec::new")]
    records: Vec<T>,
}

impl<T> Default for Records<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

impl<T: Record> Records<T> {
    /// Reserve the next id. Skips any id already present, which can happen
    /// when a workspace file was edited by hand.
    pub fn allocate_id(&mut self) -> String {
        loop {
            let id = format!("{:024x}", self.next_id.max(1));
            self.next_id = self.next_id.max(1) + 1;
            if !self.records.iter().any(|r| r.id() == id) {
                return id;
            }
        }
    }

    pub fn insert(&mut self, record: T) -> &T {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    fn check_id(id: &str) -> Result<(), StoreError> {
        if is_valid_id(id) {
            Ok(())
        } else {
            Err(StoreError::InvalidId {
                kind: T::KIND,
                id: id.to_string(),
            })
        }
    }

    fn not_found(id: &str) -> StoreError {
        StoreError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        }
    }

    pub fn get(&self, id: &str) -> Result<&T, StoreError> {
        Self::check_id(id)?;
        self.records
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut T, StoreError> {
        Self::check_id(id)?;
        self.records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))
    }

    pub fn remove(&mut self, id: &str) -> Result<T, StoreError> {
        Self::check_id(id)?;
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        Ok(self.records.remove(index))
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Every store, saved and loaded together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Workspace {
    pub invoices: InvoiceStore,
    pub templates: TemplateStore,
    pub configurations: ConfigurationStore,
    pub assets: AssetStore,
    pub library: ImageLibrary,
}

impl Workspace {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load `path`, or start empty if it doesn't exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
