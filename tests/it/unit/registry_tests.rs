//! Registry behaviors beyond the basics: restore, index rebuild, selection
//! clamping.

use crate::helpers::{barcode_kind, rect_kind, text_kind};
use markboard::MarkRegistry;

#[test]
fn test_restore_rebuilds_hit_testing() {
    let mut reg = MarkRegistry::new();
    reg.add_mark(rect_kind(), 0, 0);
    reg.add_mark(text_kind("a"), 500, 500);

    let snapshot = reg.snapshot_marks();

    let mut fresh = MarkRegistry::new();
    fresh.restore(snapshot);
    assert_eq!(fresh.len(), 2);
    assert_eq!(fresh.hit_test(510, 510, 1.0), Some(1));
    assert_eq!(fresh.hit_test(5, 5, 1.0), Some(0));
}

#[test]
fn test_restore_clamps_stale_selection() {
    let mut reg = MarkRegistry::new();
    reg.add_mark(rect_kind(), 0, 0);
    reg.add_mark(rect_kind(), 200, 0);
    reg.select(Some(1));
    reg.activate(Some(1));

    // Restoring a shorter list invalidates indices past the end
    reg.restore(vec![markboard::Mark::new(rect_kind(), 0, 0)]);
    assert_eq!(reg.selected(), None);
    assert_eq!(reg.active(), None);
}

#[test]
fn test_select_out_of_range_is_ignored() {
    let mut reg = MarkRegistry::new();
    reg.add_mark(rect_kind(), 0, 0);
    reg.select(Some(7));
    assert_eq!(reg.selected(), None);
    reg.select(Some(0));
    assert_eq!(reg.selected(), Some(0));
}

#[test]
fn test_snapshot_is_a_value_copy() {
    let mut reg = MarkRegistry::new();
    reg.add_mark(barcode_kind("123"), 10, 10);
    let snapshot = reg.snapshot_marks();

    reg.get_mut(0).unwrap().x = 999;
    assert_eq!(snapshot[0].x, 10);
}

#[test]
fn test_paste_at_explicit_position() {
    let mut reg = MarkRegistry::new();
    reg.add_mark(rect_kind(), 30, 40);
    reg.copy_to_clipboard(0);

    let pasted = reg.paste_from_clipboard(Some((300, 400))).unwrap();
    assert_eq!(reg.get(pasted).unwrap().x, 300);
    assert_eq!(reg.get(pasted).unwrap().y, 400);
}

#[test]
fn test_paste_with_empty_clipboard_is_noop() {
    let mut reg = MarkRegistry::new();
    assert_eq!(reg.paste_from_clipboard(None), None);
    assert!(reg.is_empty());
}

#[test]
fn test_hit_test_margin_widens_at_low_zoom() {
    let mut reg = MarkRegistry::new();
    let i = reg.add_mark(rect_kind(), 100, 100);

    // Right edge at 200; at zoom 1.0 precise tolerance is CLICK_TOLERANCE
    assert_eq!(reg.hit_test(205, 120, 1.0), Some(i));
    assert_eq!(reg.hit_test(206, 120, 1.0), None);
    // Same precise tolerance at high zoom
    assert_eq!(reg.hit_test(205, 120, 10.0), Some(i));
    assert_eq!(reg.hit_test(206, 120, 10.0), None);
}
