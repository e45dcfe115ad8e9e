//! Crate-wide constants.
//!
//! Centralizes the tuned geometry and interaction values so none of them
//! live as inline magic numbers. The zoom-tier tables, grid alignment
//! constants, and tolerances are empirically tuned; treat them as a set.

// ============================================================================
// Zoom & View
// ============================================================================

/// Minimum zoom level
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum zoom level
pub const MAX_ZOOM: f64 = 10.0;

/// Default zoom level
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Zoom at or above which screen->canvas conversion rounds to 2 decimals
/// before grid alignment (suppresses float drift at high magnification)
pub const PRECISION_ROUND_ZOOM: f64 = 4.0;

/// Minimum grid spacing in canvas units
pub const MIN_GRID_SPACING: f64 = 1.0;

/// Default grid spacing in canvas units
pub const DEFAULT_GRID_SPACING: f64 = 10.0;

// ============================================================================
// Grid Alignment
// ============================================================================

/// Working-area origin offset subtracted before grid alignment
pub const GRID_ORIGIN_OFFSET: f64 = 60.0;

/// Maximum distance (canvas units) at which a coordinate is pulled onto the
/// nearest effective grid line. Coordinates farther away are left untouched.
pub const GRID_PULL: f64 = 0.5;

/// Directional micro-adjustment applied per axis at zoom >= 5.0
pub const GRID_MICRO_ADJUST: f64 = 0.1;

// ============================================================================
// Coordinate Clamping
// ============================================================================

/// screen->canvas clamp range at zoom >= 5.0
pub const CANVAS_CLAMP_HIGH_ZOOM: (i32, i32) = (-3000, 6000);

/// screen->canvas clamp range below zoom 5.0
pub const CANVAS_CLAMP_NORMAL: (i32, i32) = (-2000, 4000);

/// Drag bounds at zoom >= 5.0
pub const DRAG_BOUNDS_HIGH: (i32, i32) = (-2000, 5000);

/// Drag bounds at zoom >= 3.0
pub const DRAG_BOUNDS_MID: (i32, i32) = (-1500, 4000);

/// Drag bounds below zoom 3.0
pub const DRAG_BOUNDS_LOW: (i32, i32) = (-1000, 3000);

// ============================================================================
// Mark Defaults
// ============================================================================

/// Minimum mark width in canvas units
pub const MIN_MARK_WIDTH: i32 = 20;

/// Minimum mark height in canvas units
pub const MIN_MARK_HEIGHT: i32 = 15;

/// Default mark size for newly placed marks
pub const DEFAULT_MARK_SIZE: (i32, i32) = (100, 40);

/// Offset applied to pasted marks so they are visibly distinct from the source
pub const PASTE_OFFSET: (i32, i32) = (10, 10);

// ============================================================================
// Input Handling
// ============================================================================

/// Extra margin (canvas units) added to each edge of a mark's bounding box
/// when hit testing
pub const CLICK_TOLERANCE: i32 = 5;

/// Side length of the resize handle square at the mark's bottom-right corner
pub const HANDLE_SIZE: i32 = 10;

/// Extra border added around the resize handle when hit testing it
pub const RESIZE_BORDER: i32 = 8;

/// Minimum pointer movement (canvas units) before a pending press becomes a
/// drag. Movement exactly equal to this does not start a drag.
pub const MIN_DRAG_DISTANCE: i32 = 3;

// ============================================================================
// History & Persistence
// ============================================================================

/// Maximum undo/redo snapshots to keep
pub const UNDO_DEPTH: usize = 10;

/// Container format name written in the header line
pub const CONTAINER_FORMAT: &str = "markboard";

/// Current container schema version
pub const SCHEMA_VERSION: u32 = 3;

/// Suffix appended to the previous file when a backup copy is taken
pub const BACKUP_SUFFIX: &str = "bak";
