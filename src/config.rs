//! Tunable constants of the layout engine.
//!
//! The page itself is not configurable; see [`crate::layout::Page::A4`].

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Thresholds used by snapping, overlap resolution, resizing and insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// An edge closer than this (strictly) to a neighbor's opposite edge
    /// snaps onto it (default: 2mm).
    pub snap_tolerance_mm: f64,
    /// Upper bound on overlap-resolution passes per move (default: 10).
    pub max_push_iterations: usize,
    /// Smallest width/height a resize can produce (default: 10mm).
    pub min_cell_size_mm: f64,
    /// Height of the band inserted above/below a cell (default: 30mm).
    pub insert_band_height_mm: f64,
    /// Width of the band inserted left/right of a cell (default: 40mm).
    pub insert_band_width_mm: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_tolerance_mm: 2.0,
            max_push_iterations: 10,
            min_cell_size_mm: 10.0,
            insert_band_height_mm: 30.0,
            insert_band_width_mm: 40.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
