//! Property-based invariant tests for the layout engine.
//!
//! 1. Pixel → mm conversion is linear
//! 2. Moves and resizes always land on the page
//! 3. A move that clears a single neighbor never overlaps it
//! 4. Edges proposed within tolerance of a neighbor snap exactly
//! 5. Releasing without moving is the identity

use invoice_canvas::config::EditorConfig;
use invoice_canvas::interaction::{CellPart, InputEvent, Interaction, PointerButton};
use invoice_canvas::layout::collision::CollisionResolver;
use invoice_canvas::layout::units::{pixel_delta_to_mm, RenderedSurface, ScreenPoint};
use invoice_canvas::layout::{resize_clamped, MmDelta, Page, Rect};
use invoice_canvas::Cell;
use proptest::prelude::*;

const EPS: f64 = 1e-9;

// ── Strategies ──────────────────────────────────────────────────────────

/// A rect of at least 10mm per side that fits on the page.
fn on_page_rect() -> impl Strategy<Value = Rect> {
    (10.0f64..=210.0, 10.0f64..=297.0)
        .prop_flat_map(|(w, h)| (0.0..=(210.0 - w), 0.0..=(297.0 - h), Just(w), Just(h)))
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

/// Multiples of 0.25mm in `[lo, hi)`.
fn quarter_mm(lo: i32, hi: i32) -> impl Strategy<Value = f64> {
    (lo * 4..hi * 4).prop_map(|q| f64::from(q) / 4.0)
}

fn surface() -> impl Strategy<Value = RenderedSurface> {
    (50.0f64..3000.0, 50.0f64..4000.0).prop_map(|(w, h)| RenderedSurface::new(w, h))
}

fn resolver() -> CollisionResolver {
    CollisionResolver::new(Page::A4, &EditorConfig::default())
}

fn assert_on_page(rect: &Rect) -> Result<(), TestCaseError> {
    prop_assert!(rect.x >= 0.0 && rect.y >= 0.0, "{:?}", rect);
    prop_assert!(rect.right() <= 210.0 + EPS, "{:?}", rect);
    prop_assert!(rect.bottom() <= 297.0 + EPS, "{:?}", rect);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Linearity
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn doubling_pixels_doubles_millimeters(
        surface in surface(),
        dx in -2000.0f64..2000.0,
        dy in -2000.0f64..2000.0,
    ) {
        let single = pixel_delta_to_mm(dx, dy, surface, &Page::A4);
        let double = pixel_delta_to_mm(2.0 * dx, 2.0 * dy, surface, &Page::A4);
        prop_assert!((double.dx - 2.0 * single.dx).abs() <= EPS * (1.0 + single.dx.abs()));
        prop_assert!((double.dy - 2.0 * single.dy).abs() <= EPS * (1.0 + single.dy.abs()));
    }

    #[test]
    fn full_surface_width_is_full_page(surface in surface()) {
        let delta = pixel_delta_to_mm(surface.width_px, surface.height_px, surface, &Page::A4);
        prop_assert!((delta.dx - 210.0).abs() < 1e-6);
        prop_assert!((delta.dy - 297.0).abs() < 1e-6);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Clamp invariant
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolved_move_stays_on_page(
        moving in on_page_rect(),
        others in prop::collection::vec(on_page_rect(), 0..6),
        px in -600.0f64..600.0,
        py in -600.0f64..600.0,
    ) {
        let delta = MmDelta::new(px - moving.x, py - moving.y);
        let r = resolver().resolve_move(&moving, px, py, delta, &others);
        assert_on_page(&moving.with_origin(r.x, r.y))?;
        prop_assert!(r.iterations <= 10);
    }

    #[test]
    fn resize_stays_on_page_and_above_minimum(
        anchor in on_page_rect(),
        dx in -500.0f64..500.0,
        dy in -500.0f64..500.0,
    ) {
        let r = resize_clamped(&anchor, MmDelta::new(dx, dy), 10.0, &Page::A4);
        assert_on_page(&r)?;
        prop_assert!(r.width >= 10.0 && r.height >= 10.0);
        prop_assert_eq!((r.x, r.y), (anchor.x, anchor.y));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. No overlap after a move
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    // The neighbor sits far enough from every page edge that the moving
    // cell fits on any side of it, so resolution always converges.
    // Quarter-millimeter values keep the edge arithmetic exact.
    #[test]
    fn move_never_ends_inside_single_neighbor(
        (bx, by, bw, bh) in (quarter_mm(60, 100), quarter_mm(60, 150), quarter_mm(10, 40), quarter_mm(10, 40)),
        (aw, ah) in (quarter_mm(10, 40), quarter_mm(10, 40)),
        (ax, ay) in (quarter_mm(0, 170), quarter_mm(0, 257)),
        (px, py) in (quarter_mm(-50, 250), quarter_mm(-50, 330)),
    ) {
        let b = Rect::new(bx, by, bw, bh);
        let a = Rect::new(ax, ay, aw, ah);
        prop_assume!(!a.overlaps(&b));

        let delta = MmDelta::new(px - ax, py - ay);
        let r = resolver().resolve_move(&a, px, py, delta, &[b]);
        let moved = a.with_origin(r.x, r.y);
        prop_assert!(r.converged);
        prop_assert!(!moved.overlaps(&b), "{:?} overlaps {:?}", moved, b);
        assert_on_page(&moved)?;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Snap exactness
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn left_edge_snaps_onto_right_edge(
        offset in -1.99f64..1.99,
        y in 75.0f64..145.0,
    ) {
        let b = Rect::new(80.0, 100.0, 50.0, 50.0);
        let a = Rect::new(0.0, 0.0, 30.0, 30.0);
        let r = resolver().resolve_move(&a, b.right() + offset, y, MmDelta::new(1.0, 1.0), &[b]);
        prop_assert_eq!(r.x, b.right());
    }

    #[test]
    fn right_edge_snaps_onto_left_edge(
        offset in -1.99f64..1.99,
        y in 75.0f64..145.0,
    ) {
        let b = Rect::new(80.0, 100.0, 50.0, 50.0);
        let a = Rect::new(0.0, 0.0, 30.0, 30.0);
        let r = resolver().resolve_move(&a, b.x - a.width + offset, y, MmDelta::new(1.0, 1.0), &[b]);
        prop_assert_eq!(r.x + a.width, b.x);
    }

    #[test]
    fn top_edge_snaps_onto_bottom_edge(
        offset in -1.99f64..1.99,
        x in 55.0f64..125.0,
    ) {
        let b = Rect::new(80.0, 100.0, 50.0, 50.0);
        let a = Rect::new(0.0, 0.0, 30.0, 30.0);
        let r = resolver().resolve_move(&a, x, b.bottom() + offset, MmDelta::new(1.0, 1.0), &[b]);
        prop_assert_eq!(r.y, b.bottom());
    }

    #[test]
    fn bottom_edge_snaps_onto_top_edge(
        offset in -1.99f64..1.99,
        x in 55.0f64..125.0,
    ) {
        let b = Rect::new(80.0, 100.0, 50.0, 50.0);
        let a = Rect::new(0.0, 0.0, 30.0, 30.0);
        let r = resolver().resolve_move(&a, x, b.y - a.height + offset, MmDelta::new(1.0, 1.0), &[b]);
        prop_assert_eq!(r.y + a.height, b.y);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Idempotent release
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn press_release_is_identity(
        rect in on_page_rect(),
        resize in any::<bool>(),
        (x, y) in (-100.0f64..1000.0, -100.0f64..1000.0),
    ) {
        let mut cells = vec![Cell::new_text("c", rect, "f")];
        let before = cells.clone();
        let mut interaction = Interaction::default();
        let part = if resize { CellPart::ResizeHandle } else { CellPart::Body };
        interaction.handle(
            &InputEvent::PointerDown {
                cell_id: "c".into(),
                part,
                button: PointerButton::Primary,
                position: ScreenPoint::new(x, y),
            },
            &mut cells,
        );
        interaction.handle(&InputEvent::PointerUp { position: ScreenPoint::new(0.0, 0.0) }, &mut cells);
        prop_assert_eq!(cells, before);
        prop_assert!(!interaction.is_dragging());
    }
}
