//! Schema-stability snapshots of the serialized forms.
//!
//! The container stores these shapes on disk; a change here is a schema
//! version bump, not a refactor.

use crate::helpers::rect_kind;
use markboard::{Mark, ViewState};

#[test]
fn test_mark_wire_shape() {
    let mark = Mark::new(rect_kind(), 10, 20);
    insta::assert_json_snapshot!(mark, @r###"
    {
      "x": 10,
      "y": 20,
      "width": 100,
      "height": 40,
      "z": 0,
      "angle": 0.0,
      "name": "rect",
      "flags": {
        "clear_transparency": false,
        "mirror": false,
        "lock_size": false,
        "disable_print": false
      },
      "can_drag": true,
      "can_resize": true,
      "kind": {
        "type": "Rectangle",
        "payload": {
          "filled": false,
          "line_width": 1.0
        }
      }
    }
    "###);
}

#[test]
fn test_view_state_wire_shape() {
    insta::assert_json_snapshot!(ViewState::default(), @r###"
    {
      "zoom": 1.0,
      "offset_x": 0,
      "offset_y": 0,
      "grid_visible": false,
      "grid_spacing": 10.0,
      "move_view_mode": false,
      "material_boundary_visible": false,
      "dot_preview_enabled": false
    }
    "###);
}
