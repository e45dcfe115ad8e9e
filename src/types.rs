//! Core types for the markboard canvas system.
//!
//! This module defines the fundamental data structures used throughout the
//! crate: marks, their kind-specific payloads, per-kind capabilities, and
//! the view state that drives the coordinate transform.

use crate::constants::{
    DEFAULT_GRID_SPACING, DEFAULT_MARK_SIZE, DEFAULT_ZOOM, MAX_ZOOM, MIN_GRID_SPACING,
    MIN_MARK_HEIGHT, MIN_MARK_WIDTH, MIN_ZOOM,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Mark Payloads
// ============================================================================

/// Barcode symbologies the engraver understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbology {
    Code128,
    Code39,
    QrCode,
    DataMatrix,
}

impl Default for Symbology {
    fn default() -> Self {
        Self::Code128
    }
}

/// Kind-specific payload of a mark.
///
/// Serialized adjacently tagged (`type` / `payload`) so the container keeps
/// the type tag next to a kind-specific key/value payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum MarkKind {
    /// A block of engraved text
    Text {
        content: String,
        font: String,
        font_size: f64,
    },
    /// A straight line; the endpoint is expressed relative to the mark origin
    Line { end_dx: i32, end_dy: i32, thickness: f64 },
    /// An axis-aligned rectangle outline or fill
    Rectangle { filled: bool, line_width: f64 },
    /// A polyline graph of relative points
    Graph { points: Vec<(i32, i32)> },
    /// A barcode with its encoded data
    Barcode {
        data: String,
        symbology: Symbology,
        show_text: bool,
    },
}

/// Per-kind behavior table: minimum sizes and default gesture capabilities.
///
/// Dispatching behavior through this record instead of matching on the kind
/// at every call site keeps kind-specific policy in one place.
#[derive(Clone, Copy, Debug)]
pub struct MarkCapabilities {
    pub draggable: bool,
    pub resizable: bool,
    pub min_width: i32,
    pub min_height: i32,
}

impl MarkKind {
    /// Capability record for this kind.
    pub fn capabilities(&self) -> MarkCapabilities {
        match self {
            // Lines scale through their endpoint, not through a box resize
            MarkKind::Line { .. } => MarkCapabilities {
                draggable: true,
                resizable: false,
                min_width: MIN_MARK_WIDTH,
                min_height: MIN_MARK_HEIGHT,
            },
            MarkKind::Barcode { .. } => MarkCapabilities {
                draggable: true,
                resizable: true,
                // Barcodes need room for quiet zones
                min_width: MIN_MARK_WIDTH * 2,
                min_height: MIN_MARK_HEIGHT,
            },
            _ => MarkCapabilities {
                draggable: true,
                resizable: true,
                min_width: MIN_MARK_WIDTH,
                min_height: MIN_MARK_HEIGHT,
            },
        }
    }

    /// Short tag used for default mark names.
    pub fn tag(&self) -> &'static str {
        match self {
            MarkKind::Text { .. } => "text",
            MarkKind::Line { .. } => "line",
            MarkKind::Rectangle { .. } => "rect",
            MarkKind::Graph { .. } => "graph",
            MarkKind::Barcode { .. } => "barcode",
        }
    }
}

// ============================================================================
// Mark
// ============================================================================

/// Boolean attributes shared by every mark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkFlags {
    #[serde(default)]
    pub clear_transparency: bool,
    #[serde(default)]
    pub mirror: bool,
    /// Suppresses resizing entirely, including the minimum-size invariant
    #[serde(default)]
    pub lock_size: bool,
    #[serde(default)]
    pub disable_print: bool,
}

/// A single placeable graphical object on the canvas.
///
/// Positions and sizes are integer canvas units. The `id` is runtime-only
/// (spatial index key) and is regenerated on load; persistence references
/// marks by registry index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(skip)]
    pub id: u64,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Layer order; independent of insertion order
    pub z: i32,
    /// Rotation in degrees
    pub angle: f64,
    pub name: String,
    #[serde(default)]
    pub flags: MarkFlags,
    /// Per-instance gesture capabilities, independent of kind
    #[serde(default = "default_true")]
    pub can_drag: bool,
    #[serde(default = "default_true")]
    pub can_resize: bool,
    pub kind: MarkKind,
}

fn default_true() -> bool {
    true
}

impl Mark {
    /// Create a mark of the given kind at a position, using kind defaults
    /// for size and capabilities.
    pub fn new(kind: MarkKind, x: i32, y: i32) -> Self {
        let caps = kind.capabilities();
        let (w, h) = DEFAULT_MARK_SIZE;
        Self {
            id: 0,
            x,
            y,
            width: w.max(caps.min_width),
            height: h.max(caps.min_height),
            z: 0,
            angle: 0.0,
            name: kind.tag().to_string(),
            flags: MarkFlags::default(),
            can_drag: caps.draggable,
            can_resize: caps.resizable,
            kind,
        }
    }

    /// Tolerance-expanded containment test in canvas units.
    pub fn contains(&self, cx: i32, cy: i32, tolerance: i32) -> bool {
        cx >= self.x - tolerance
            && cx <= self.x + self.width + tolerance
            && cy >= self.y - tolerance
            && cy <= self.y + self.height + tolerance
    }

    /// Whether this mark accepts resize gestures at all.
    pub fn resizable(&self) -> bool {
        self.can_resize && !self.flags.lock_size && self.kind.capabilities().resizable
    }

    /// Whether this mark accepts drag gestures.
    pub fn draggable(&self) -> bool {
        self.can_drag && self.kind.capabilities().draggable
    }

    /// Minimum size for this mark, from the kind capability table.
    pub fn min_size(&self) -> (i32, i32) {
        let caps = self.kind.capabilities();
        (caps.min_width, caps.min_height)
    }
}

// ============================================================================
// View State
// ============================================================================

/// Zoom, pan, and grid configuration of the canvas view.
///
/// The coordinate transform is pure over a snapshot of this struct.
/// Decoding goes through [`ViewStateWire`] so a container cannot carry
/// out-of-range zoom or grid spacing into the live view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ViewStateWire")]
pub struct ViewState {
    zoom: f64,
    pub offset_x: i32,
    pub offset_y: i32,
    pub grid_visible: bool,
    grid_spacing: f64,
    /// When set, pointer gestures pan the view instead of touching marks
    #[serde(default)]
    pub move_view_mode: bool,
    #[serde(default)]
    pub material_boundary_visible: bool,
    #[serde(default)]
    pub dot_preview_enabled: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            offset_x: 0,
            offset_y: 0,
            grid_visible: false,
            grid_spacing: DEFAULT_GRID_SPACING,
            move_view_mode: false,
            material_boundary_visible: false,
            dot_preview_enabled: false,
        }
    }
}

impl ViewState {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom level, clamped to the supported range. Out-of-range
    /// values are recovered locally, never rejected.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn grid_spacing(&self) -> f64 {
        self.grid_spacing
    }

    pub fn set_grid_spacing(&mut self, spacing: f64) {
        self.grid_spacing = spacing.max(MIN_GRID_SPACING);
    }

    /// Pan the view by a raw screen-space delta.
    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.offset_x += dx;
        self.offset_y += dy;
    }
}

/// Raw decoded form of [`ViewState`]. The conversion funnels zoom and grid
/// spacing through the same setters the UI uses, so the invariants hold no
/// matter what the container says.
#[derive(Deserialize)]
struct ViewStateWire {
    zoom: f64,
    offset_x: i32,
    offset_y: i32,
    grid_visible: bool,
    grid_spacing: f64,
    #[serde(default)]
    move_view_mode: bool,
    #[serde(default)]
    material_boundary_visible: bool,
    #[serde(default)]
    dot_preview_enabled: bool,
}

impl From<ViewStateWire> for ViewState {
    fn from(wire: ViewStateWire) -> Self {
        let mut view = ViewState {
            zoom: DEFAULT_ZOOM,
            offset_x: wire.offset_x,
            offset_y: wire.offset_y,
            grid_visible: wire.grid_visible,
            grid_spacing: DEFAULT_GRID_SPACING,
            move_view_mode: wire.move_view_mode,
            material_boundary_visible: wire.material_boundary_visible,
            dot_preview_enabled: wire.dot_preview_enabled,
        };
        view.set_zoom(wire.zoom);
        view.set_grid_spacing(wire.grid_spacing);
        view
    }
}

// ============================================================================
// Pointer Events
// ============================================================================

/// A pointer event in raw screen coordinates.
///
/// The core has no dependency on any UI toolkit's event types; the embedding
/// event loop converts its native events into these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub screen_x: f64,
    pub screen_y: f64,
}

impl PointerEvent {
    pub fn new(screen_x: f64, screen_y: f64) -> Self {
        Self { screen_x, screen_y }
    }
}

/// Painter callback implemented by the embedding renderer. The core supplies
/// geometry only; pixel-level drawing of each kind happens outside.
pub trait MarkPainter {
    fn draw(&mut self, mark: &Mark, selected: bool);
}
