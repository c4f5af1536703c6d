//! Screen pixels to page millimeters.
//!
//! The page is drawn at whatever size the host gives it, but always with
//! the A4 aspect ratio. A pointer delta in pixels converts to millimeters by
//! scaling each axis with `page_mm / rendered_px`.

use serde::{Deserialize, Serialize};

use super::{MmDelta, Page};

/// A pointer position in host (screen) pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The on-screen size of the rendered page at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSurface {
    pub width_px: f64,
    pub height_px: f64,
}

impl RenderedSurface {
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            width_px,
            height_px,
        }
    }

    /// A surface that hasn't been laid out yet (or was collapsed) can't be
    /// used to convert anything.
    pub fn is_usable(&self) -> bool {
        self.width_px.is_finite()
            && self.height_px.is_finite()
            && self.width_px > 0.0
            && self.height_px > 0.0
    }
}

/// Convert a pixel delta to a millimeter delta.
///
/// Returns [`MmDelta::ZERO`] when the surface has no usable size; callers
/// should check [`RenderedSurface::is_usable`] and skip the update instead
/// of applying the zero delta.
pub fn pixel_delta_to_mm(dx_px: f64, dy_px: f64, surface: RenderedSurface, page: &Page) -> MmDelta {
    if !surface.is_usable() {
        return MmDelta::ZERO;
    }
    let mm_per_px_x = page.width / surface.width_px;
    let mm_per_px_y = page.height / surface.height_px;
    MmDelta::new(dx_px * mm_per_px_x, dy_px * mm_per_px_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_pixel_per_mm() {
        let d = pixel_delta_to_mm(10.0, -20.0, RenderedSurface::new(210.0, 297.0), &Page::A4);
        assert_eq!(d, MmDelta::new(10.0, -20.0));
    }

    #[test]
    fn test_axes_scale_independently() {
        // 794 × 1123 is A4 at 96 dpi.
        let d = pixel_delta_to_mm(794.0, 1123.0, RenderedSurface::new(794.0, 1123.0), &Page::A4);
        assert!((d.dx - 210.0).abs() < 1e-9);
        assert!((d.dy - 297.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_surface_is_noop() {
        let d = pixel_delta_to_mm(50.0, 50.0, RenderedSurface::new(0.0, 1123.0), &Page::A4);
        assert_eq!(d, MmDelta::ZERO);
        let d = pixel_delta_to_mm(50.0, 50.0, RenderedSurface::new(f64::NAN, 10.0), &Page::A4);
        assert_eq!(d, MmDelta::ZERO);
    }
}
