//! Interaction state machine for pointer gestures.
//!
//! A single explicit state machine instead of scattered boolean flags,
//! making impossible states unrepresentable.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> PendingPress     (pointer down inside a mark's hit bounds)
//! Idle -> Resizing         (pointer down on a resizable mark's handle)
//! Idle -> PanningView      (pointer down with move-view mode set)
//! PendingPress -> Dragging (movement beyond the drag threshold)
//!
//! Any -> Idle              (pointer up - finalizes the gesture)
//! ```

use crate::types::Mark;

/// How the drag threshold is measured while a press is pending.
///
/// `GestureStart` measures against the press position, so sub-threshold
/// jitter accumulates until it adds up to a drag. `LastSample` re-records
/// the comparison point on every sub-threshold move, so jitter never
/// accumulates and the threshold must be beaten within one event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragThresholdMode {
    #[default]
    GestureStart,
    LastSample,
}

/// Geometry of one mark captured when a gesture begins, used for
/// change detection on release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureOrigin {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl GestureOrigin {
    pub fn of(mark: &Mark) -> Self {
        Self {
            x: mark.x,
            y: mark.y,
            width: mark.width,
            height: mark.height,
        }
    }

    pub fn matches(&self, mark: &Mark) -> bool {
        self.x == mark.x
            && self.y == mark.y
            && self.width == mark.width
            && self.height == mark.height
    }
}

/// Current pointer gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
    /// No active gesture
    #[default]
    Idle,

    /// Pressed on a mark, threshold not yet exceeded
    PendingPress {
        mark_index: usize,
        origin: GestureOrigin,
        /// pointer - mark origin, canvas units
        drag_offset: (i32, i32),
        /// Press position; the threshold reference in GestureStart mode
        press_pos: (i32, i32),
        /// Re-recorded on every move; the reference in LastSample mode
        last_pos: (i32, i32),
    },

    /// Actively dragging a mark
    Dragging {
        mark_index: usize,
        origin: GestureOrigin,
        drag_offset: (i32, i32),
    },

    /// Actively resizing a mark from its bottom-right handle
    Resizing {
        mark_index: usize,
        origin: GestureOrigin,
    },

    /// Move-view mode: panning the canvas, marks untouched
    PanningView {
        /// Last screen position for delta calculation
        last_screen: (i32, i32),
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingPress { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, Self::Resizing { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Self::PanningView { .. })
    }

    /// Index of the mark involved in the current gesture, if any.
    pub fn gesture_mark(&self) -> Option<usize> {
        match self {
            Self::PendingPress { mark_index, .. }
            | Self::Dragging { mark_index, .. }
            | Self::Resizing { mark_index, .. } => Some(*mark_index),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
