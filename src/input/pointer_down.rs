//! Pointer down handling - selection, drag/resize initiation.

use crate::constants::{HANDLE_SIZE, RESIZE_BORDER};
use crate::editor::MarkEditor;
use crate::input::state::{GestureOrigin, InteractionState};
use crate::types::PointerEvent;
use tracing::trace;

impl MarkEditor {
    /// Handle a pointer press.
    ///
    /// In move-view mode the press starts a canvas pan. Otherwise the press
    /// is hit-tested against the marks (top-most first); a hit on the
    /// bottom-right resize handle of a resizable mark starts a resize, any
    /// other hit arms a pending press that becomes a drag once the movement
    /// threshold is exceeded. Selection follows the hit either way.
    pub fn on_pointer_down(&mut self, event: PointerEvent) {
        if self.view.move_view_mode {
            self.interaction = InteractionState::PanningView {
                last_screen: (event.screen_x.round() as i32, event.screen_y.round() as i32),
            };
            return;
        }

        let (cx, cy) = self.canvas_pos(event);
        let Some(index) = self.registry.hit_test(cx, cy, self.view.zoom()) else {
            self.registry.select(None);
            return;
        };
        self.registry.select(Some(index));

        let Some(mark) = self.registry.get(index) else {
            return;
        };

        // Resize handle: a HANDLE_SIZE square at the bottom-right corner,
        // expanded by RESIZE_BORDER on all sides
        let hx = mark.x + mark.width;
        let hy = mark.y + mark.height;
        let on_handle = cx >= hx - HANDLE_SIZE - RESIZE_BORDER
            && cx <= hx + RESIZE_BORDER
            && cy >= hy - HANDLE_SIZE - RESIZE_BORDER
            && cy <= hy + RESIZE_BORDER;

        if on_handle && mark.resizable() {
            trace!(index, "resize gesture started");
            self.interaction = InteractionState::Resizing {
                mark_index: index,
                origin: GestureOrigin::of(mark),
            };
        } else if mark.draggable() {
            self.interaction = InteractionState::PendingPress {
                mark_index: index,
                origin: GestureOrigin::of(mark),
                drag_offset: (cx - mark.x, cy - mark.y),
                press_pos: (cx, cy),
                last_pos: (cx, cy),
            };
        }
        // Neither draggable nor on a usable handle: selection only, stay Idle
    }
}
