//! Pointer up handling - gesture commit.
//!
//! History is only touched here: partial in-progress drags are never
//! visible as undo snapshots.

use crate::editor::MarkEditor;
use crate::input::state::InteractionState;
use crate::types::PointerEvent;
use tracing::debug;

impl MarkEditor {
    /// Finalize the current gesture.
    ///
    /// If a drag or resize actually changed the mark's geometry relative to
    /// the gesture start, the pre-gesture mark list is pushed as an undo
    /// snapshot. Unchanged gestures and pans record nothing.
    pub fn on_pointer_up(&mut self, _event: PointerEvent) {
        let committed = match self.interaction {
            InteractionState::Dragging { mark_index, origin, .. }
            | InteractionState::Resizing { mark_index, origin } => {
                self.registry.sync_index(mark_index);
                match self.registry.get(mark_index) {
                    Some(mark) if !origin.matches(mark) => Some((mark_index, origin)),
                    _ => None,
                }
            }
            _ => None,
        };

        if let Some((index, origin)) = committed {
            // Reconstruct the pre-mutation list: only the gesture mark moved
            let mut marks = self.registry.snapshot_marks();
            if let Some(m) = marks.get_mut(index) {
                m.x = origin.x;
                m.y = origin.y;
                m.width = origin.width;
                m.height = origin.height;
            }
            self.store.push_undo(marks);
            debug!(index, "gesture committed");
        }

        self.interaction.reset();
    }
}
