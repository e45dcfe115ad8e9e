//! Screen/canvas coordinate conversion.
//!
//! Pure functions over a [`ViewState`] snapshot; no shared mutable state, so
//! these may be called from any thread. Out-of-range inputs are recovered by
//! clamping, never rejected.
//!
//! The tolerance, bounds, and grid constants are tiered by zoom so that
//! pixel-equivalent precision is preserved across the whole zoom range: a
//! single fixed threshold would be too coarse zoomed in and too tight
//! zoomed out.

use crate::constants::{
    CANVAS_CLAMP_HIGH_ZOOM, CANVAS_CLAMP_NORMAL, DRAG_BOUNDS_HIGH, DRAG_BOUNDS_LOW,
    DRAG_BOUNDS_MID, GRID_MICRO_ADJUST, GRID_ORIGIN_OFFSET, GRID_PULL, PRECISION_ROUND_ZOOM,
};
use crate::types::ViewState;

/// Convert a screen position to integer canvas coordinates.
///
/// Applies, in order: the zoom/offset transform, 2-decimal precision
/// rounding at high zoom, per-axis grid alignment when the grid is visible,
/// and the zoom-tiered clamp box.
pub fn screen_to_canvas(sx: f64, sy: f64, view: &ViewState) -> (i32, i32) {
    let zoom = view.zoom();
    let mut cx = (sx - f64::from(view.offset_x)) / zoom;
    let mut cy = (sy - f64::from(view.offset_y)) / zoom;

    if zoom >= PRECISION_ROUND_ZOOM {
        cx = round2(cx);
        cy = round2(cy);
    }

    if view.grid_visible {
        cx = grid_align(cx, zoom, view.grid_spacing());
        cy = grid_align(cy, zoom, view.grid_spacing());
    }

    let (lo, hi) = if zoom >= 5.0 {
        CANVAS_CLAMP_HIGH_ZOOM
    } else {
        CANVAS_CLAMP_NORMAL
    };

    (
        (cx.round() as i32).clamp(lo, hi),
        (cy.round() as i32).clamp(lo, hi),
    )
}

/// Convert canvas coordinates to screen position.
///
/// The inverse transform is unclamped: marks are allowed to project outside
/// the visible area.
pub fn canvas_to_screen(cx: i32, cy: i32, view: &ViewState) -> (f64, f64) {
    let zoom = view.zoom();
    (
        f64::from(cx) * zoom + f64::from(view.offset_x),
        f64::from(cy) * zoom + f64::from(view.offset_y),
    )
}

/// Align one axis coordinate to the grid.
///
/// This is alignment assistance, not snapping: only coordinates already
/// within [`GRID_PULL`] of an effective grid line are pulled onto it. The
/// effective spacing shrinks as zoom rises so the assistance stays
/// proportionate to on-screen pixel density. At zoom >= 5.0 a directional
/// micro-adjustment compensates for accumulated rounding in the offset
/// coordinate.
pub fn grid_align(coord: f64, zoom: f64, spacing: f64) -> f64 {
    let mut v = coord - GRID_ORIGIN_OFFSET;

    let effective = if zoom >= 4.0 {
        spacing / 2.0
    } else if zoom >= 2.0 {
        spacing * 0.8
    } else {
        spacing
    };

    let nearest = (v / effective).round() * effective;
    if (nearest - v).abs() <= GRID_PULL {
        v = nearest;
    }

    if zoom >= 5.0 {
        let frac = v - v.floor();
        if frac < 0.5 {
            v -= GRID_MICRO_ADJUST;
        } else {
            v += GRID_MICRO_ADJUST;
        }
    }

    v + GRID_ORIGIN_OFFSET
}

/// Extra margin (canvas units) around a mark's bounds when testing whether
/// a pointer hits it. Non-increasing in zoom.
pub fn hit_tolerance(zoom: f64) -> f64 {
    if zoom >= 5.0 {
        (5.0 / zoom).max(2.0)
    } else if zoom >= 3.0 {
        (8.0 / zoom).max(3.0)
    } else if zoom >= 1.5 {
        (10.0 / zoom).max(4.0)
    } else {
        (15.0 / zoom).max(5.0)
    }
}

fn drag_bounds(zoom: f64) -> (i32, i32) {
    if zoom >= 5.0 {
        DRAG_BOUNDS_HIGH
    } else if zoom >= 3.0 {
        DRAG_BOUNDS_MID
    } else {
        DRAG_BOUNDS_LOW
    }
}

/// Whether a canvas coordinate lies inside the zoom-tiered drag rectangle.
pub fn within_drag_bounds(cx: i32, cy: i32, zoom: f64) -> bool {
    let (lo, hi) = drag_bounds(zoom);
    cx >= lo && cx <= hi && cy >= lo && cy <= hi
}

/// Nearest valid coordinate inside the drag rectangle. A drag target outside
/// the tiered bounds continues the gesture here rather than aborting it.
pub fn clamp_to_drag_bounds(cx: i32, cy: i32, zoom: f64) -> (i32, i32) {
    let (lo, hi) = drag_bounds(zoom);
    (cx.clamp(lo, hi), cy.clamp(lo, hi))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
