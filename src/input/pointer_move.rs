//! Pointer move handling - drag threshold, dragging, resizing, panning.
//!
//! Move events arrive at display rate during a gesture; each arm does a
//! minimal amount of work and the spatial index is only refreshed when the
//! gesture commits, not per move.

use crate::constants::MIN_DRAG_DISTANCE;
use crate::editor::MarkEditor;
use crate::input::state::{DragThresholdMode, InteractionState};
use crate::transform::clamp_to_drag_bounds;
use crate::types::PointerEvent;

impl MarkEditor {
    pub fn on_pointer_move(&mut self, event: PointerEvent) {
        match self.interaction {
            InteractionState::Idle => {}

            InteractionState::PanningView { last_screen } => {
                let sx = event.screen_x.round() as i32;
                let sy = event.screen_y.round() as i32;
                self.view.pan_by(sx - last_screen.0, sy - last_screen.1);
                self.interaction = InteractionState::PanningView { last_screen: (sx, sy) };
            }

            InteractionState::PendingPress {
                mark_index,
                origin,
                drag_offset,
                press_pos,
                last_pos,
            } => {
                let (cx, cy) = self.canvas_pos(event);
                let reference = match self.threshold_mode {
                    DragThresholdMode::LastSample => last_pos,
                    DragThresholdMode::GestureStart => press_pos,
                };
                // Movement strictly equal to the threshold does not start a drag
                let exceeded = (cx - reference.0).abs() > MIN_DRAG_DISTANCE
                    || (cy - reference.1).abs() > MIN_DRAG_DISTANCE;

                if exceeded {
                    self.interaction = InteractionState::Dragging {
                        mark_index,
                        origin,
                        drag_offset,
                    };
                    self.apply_drag(mark_index, cx, cy, drag_offset);
                } else {
                    self.interaction = InteractionState::PendingPress {
                        mark_index,
                        origin,
                        drag_offset,
                        press_pos,
                        last_pos: (cx, cy),
                    };
                }
            }

            InteractionState::Dragging { mark_index, drag_offset, .. } => {
                let (cx, cy) = self.canvas_pos(event);
                self.apply_drag(mark_index, cx, cy, drag_offset);
            }

            InteractionState::Resizing { mark_index, .. } => {
                let (cx, cy) = self.canvas_pos(event);
                self.apply_resize(mark_index, cx, cy);
            }
        }
    }

    /// Position the mark under the pointer, honoring the negative-edge floor
    /// (a mark may hang at most halfway off the top/left edge) and the
    /// zoom-tiered drag bounds. An out-of-bounds target continues the
    /// gesture at the nearest valid coordinate.
    fn apply_drag(&mut self, index: usize, cx: i32, cy: i32, offset: (i32, i32)) {
        let zoom = self.view.zoom();
        if let Some(mark) = self.registry.get_mut(index) {
            let nx = (cx - offset.0).max(-mark.width / 2);
            let ny = (cy - offset.1).max(-mark.height / 2);
            let (nx, ny) = clamp_to_drag_bounds(nx, ny, zoom);
            mark.x = nx;
            mark.y = ny;
        }
    }

    /// Size the mark toward the pointer, never below its kind minimums,
    /// regardless of how far the pointer moves past the origin.
    fn apply_resize(&mut self, index: usize, cx: i32, cy: i32) {
        if let Some(mark) = self.registry.get_mut(index) {
            let (min_w, min_h) = mark.min_size();
            mark.width = (cx - mark.x).max(min_w);
            mark.height = (cy - mark.y).max(min_h);
        }
    }
}
