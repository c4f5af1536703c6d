//! Structured error types for the invoice canvas.
//!
//! The layout engine itself never fails: it clamps, snaps and pushes, and
//! accepts a best-effort result when it can't do better. Errors come from
//! the edges of the crate: parsing JSON input, validating property updates,
//! and the persistence collaborators.

use thiserror::Error;

use crate::store::StoreError;

/// The unified error type returned by all public fallible functions.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// JSON input failed to parse as a valid document, patch or workspace.
    #[error("Failed to parse input: {source}{}", render_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A command referenced a cell id that isn't in the collection.
    #[error("No cell with id '{0}'")]
    UnknownCell(String),

    /// A property update was rejected at the boundary.
    #[error("Invalid cell update: {0}")]
    InvalidPatch(String),

    /// A persistence collaborator refused the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An uploaded image payload couldn't be decoded.
    #[error("Image error: {0}")]
    Image(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn render_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected shape. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        CanvasError::Parse { source: e, hint }
    }
}

pub type Result<T, E = CanvasError> = std::result::Result<T, E>;
