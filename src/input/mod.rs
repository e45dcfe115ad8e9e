//! Pointer input handling for the canvas.
//!
//! Implements the per-gesture interaction state machine that turns raw
//! pointer events (converted through the coordinate transform) into
//! mutations on the selected mark.
//!
//! ## Architecture
//!
//! The input system uses an explicit state machine (`InteractionState`)
//! rather than scattered boolean flags. The handlers are methods on
//! [`MarkEditor`](crate::editor::MarkEditor), split across files by event:
//!
//! - `state` - Interaction state machine enum and helpers
//! - `pointer_down` - Hit testing, selection, gesture start
//! - `pointer_move` - Drag threshold, drag/resize updates, panning
//! - `pointer_up` - Gesture commit and undo snapshot push
//!
//! Everything here must stay confined to the single interaction thread; the
//! handlers mutate the registry directly.

mod pointer_down;
mod pointer_move;
mod pointer_up;
mod state;

pub use state::{DragThresholdMode, GestureOrigin, InteractionState};
