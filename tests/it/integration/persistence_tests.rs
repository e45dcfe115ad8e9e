//! Project container round trips, backups, and damage tolerance.

use crate::helpers::{TestEditorBuilder, barcode_kind, rect_kind};
use flate2::Compression;
use flate2::write::GzEncoder;
use markboard::MarkEditor;
use markboard::project::ProjectError;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

fn project_editor() -> MarkEditor {
    let mut editor = TestEditorBuilder::new()
        .with_rect(10, 10)
        .with_text("serial", 200, 50)
        .with_mark(barcode_kind("4006381333931"), 50, 300)
        .with_zoom(2.5)
        .with_offset(30, -20)
        .with_grid(12.0)
        .build();
    editor.registry.select(Some(1));
    editor.store.work_mode.print_count = 2;
    editor
}

/// Gzip `body` and write it under a `markboard/<version>` header, bypassing
/// the normal save path.
fn write_raw(path: &Path, version: &str, body: &[u8]) {
    let mut out = format!("markboard/{version}\n").into_bytes();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body).unwrap();
    out.extend(encoder.finish().unwrap());
    fs::write(path, out).unwrap();
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");

    let mut editor = project_editor();
    editor.save_project(&path).unwrap();

    let mut loaded = MarkEditor::new();
    let report = loaded.load_project(&path).unwrap();
    assert!(report.is_clean());

    assert_eq!(loaded.registry.marks().len(), 3);
    for (a, b) in editor.registry.marks().iter().zip(loaded.registry.marks()) {
        assert_eq!((a.x, a.y, a.width, a.height), (b.x, b.y, b.width, b.height));
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.name, b.name);
    }
    assert_eq!(loaded.view, editor.view);
    assert_eq!(loaded.registry.selected(), Some(1));
    assert_eq!(loaded.store.work_mode.print_count, 2);
    assert_eq!(loaded.store.meta.id, editor.store.meta.id);
}

#[test]
fn test_round_trip_preserves_history_and_clipboard() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");

    let mut editor = project_editor();
    editor.push_undo_snapshot();
    editor.registry.get_mut(0).unwrap().x = 77;
    editor.registry.copy_to_clipboard(0);
    editor.save_project(&path).unwrap();

    let mut loaded = MarkEditor::new();
    loaded.load_project(&path).unwrap();

    assert!(loaded.store.can_undo());
    assert!(loaded.undo());
    assert_eq!(loaded.registry.get(0).unwrap().x, 10);
    assert_eq!(loaded.registry.clipboard().unwrap().x, 77);
}

#[test]
fn test_out_of_range_view_values_are_clamped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");

    // A container can carry view values the UI would never produce; the
    // decoder funnels them through the same clamps as the setters
    let editor = project_editor();
    let mut value = serde_json::to_value(editor.project_state()).unwrap();
    value["view"]["zoom"] = serde_json::json!(50.0);
    value["view"]["grid_spacing"] = serde_json::json!(0.01);
    write_raw(&path, "3", &serde_json::to_vec(&value).unwrap());

    let mut loaded = MarkEditor::new();
    loaded.load_project(&path).unwrap();
    assert_eq!(loaded.view.zoom(), 10.0);
    assert_eq!(loaded.view.grid_spacing(), 1.0);
}

#[test]
fn test_save_to_bare_relative_path() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let mut editor = project_editor();
    editor.save_project(Path::new("plate.mbd")).unwrap();
    assert!(dir.path().join("plate.mbd").exists());

    let mut loaded = MarkEditor::new();
    loaded.load_project(Path::new("plate.mbd")).unwrap();
    assert_eq!(loaded.registry.marks().len(), 3);
}

#[test]
fn test_new_project_resets_session_state() {
    let mut editor = project_editor();
    editor.registry.copy_to_clipboard(0);
    editor.push_undo_snapshot();
    let old_id = editor.store.meta.id;

    editor.new_project();

    assert!(editor.registry.is_empty());
    assert_eq!(editor.registry.selected(), None);
    assert!(editor.registry.clipboard().is_none());
    assert!(!editor.store.can_undo());
    assert_eq!(editor.store.work_mode.print_count, 0);
    assert_ne!(editor.store.meta.id, old_id);
    assert_eq!(editor.view.zoom(), 1.0);
    assert!(editor.interaction.is_idle());
}

// ============================================================================
// Backups
// ============================================================================

#[test]
fn test_second_save_backs_up_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");
    let backup = dir.path().join("plate.mbd.bak");

    let mut editor = project_editor();
    editor.save_project(&path).unwrap();
    let first = fs::read(&path).unwrap();
    assert!(!backup.exists());

    editor.registry.add_mark(rect_kind(), 400, 400);
    editor.save_project(&path).unwrap();

    assert_eq!(fs::read(&backup).unwrap(), first);
    assert_ne!(fs::read(&path).unwrap(), first);
}

#[test]
fn test_backups_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");

    let mut editor = project_editor();
    editor.store.backups_enabled = false;
    editor.save_project(&path).unwrap();
    editor.save_project(&path).unwrap();

    assert!(!dir.path().join("plate.mbd.bak").exists());
}

// ============================================================================
// Damage tolerance
// ============================================================================

#[test]
fn test_foreign_version_loads_best_effort() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");

    let mut editor = project_editor();
    editor.save_project(&path).unwrap();

    // Rewrite the header as a future version, body untouched
    let bytes = fs::read(&path).unwrap();
    let newline = bytes.iter().position(|&b| b == b'\n').unwrap();
    let mut rewritten = b"markboard/99\n".to_vec();
    rewritten.extend_from_slice(&bytes[newline + 1..]);
    fs::write(&path, rewritten).unwrap();

    let mut loaded = MarkEditor::new();
    let report = loaded.load_project(&path).unwrap();
    assert!(!report.version_ok);
    assert!(!report.is_clean());
    assert_eq!(report.skipped_marks, 0);
    assert_eq!(loaded.registry.marks().len(), 3);
}

#[test]
fn test_garbled_header_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");
    fs::write(&path, b"notaboard/3\nwhatever").unwrap();

    let mut editor = MarkEditor::new();
    assert!(matches!(
        editor.load_project(&path),
        Err(ProjectError::Corrupt(_))
    ));
}

#[test]
fn test_non_gzip_payload_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");
    fs::write(&path, b"markboard/3\nthis is not a gzip stream").unwrap();

    let mut editor = MarkEditor::new();
    assert!(matches!(
        editor.load_project(&path),
        Err(ProjectError::Corrupt(_))
    ));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = MarkEditor::new();
    assert!(matches!(
        editor.load_project(&dir.path().join("absent.mbd")),
        Err(ProjectError::Io(_))
    ));
}

#[test]
fn test_unknown_top_level_fields_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");

    let editor = project_editor();
    let mut value = serde_json::to_value(editor.project_state()).unwrap();
    value
        .as_object_mut()
        .unwrap()
        .insert("layout_hints".into(), serde_json::json!({"dpi": 600}));
    write_raw(&path, "3", &serde_json::to_vec(&value).unwrap());

    let mut loaded = MarkEditor::new();
    let report = loaded.load_project(&path).unwrap();
    assert!(report.is_clean());
    assert_eq!(loaded.registry.marks().len(), 3);
}

#[test]
fn test_unreadable_mark_entry_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");

    let editor = project_editor();
    let mut value = serde_json::to_value(editor.project_state()).unwrap();
    // Strip a required field from the second mark
    let Value::Array(marks) = &mut value["marks"] else {
        panic!("marks section missing");
    };
    marks[1].as_object_mut().unwrap().remove("x");
    write_raw(&path, "3", &serde_json::to_vec(&value).unwrap());

    let mut loaded = MarkEditor::new();
    let report = loaded.load_project(&path).unwrap();
    assert!(report.version_ok);
    assert!(!report.is_clean());
    assert_eq!(report.skipped_marks, 1);
    assert_eq!(loaded.registry.marks().len(), 2);
}

#[test]
fn test_missing_sections_are_defaulted_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");
    write_raw(&path, "3", br#"{"marks": []}"#);

    let mut loaded = MarkEditor::new();
    let report = loaded.load_project(&path).unwrap();
    assert!(report.version_ok);
    assert!(report.defaulted.contains(&"view".to_string()));
    assert!(report.defaulted.contains(&"meta".to_string()));
    assert!(loaded.registry.is_empty());
}

// ============================================================================
// Background save / load
// ============================================================================

#[test]
fn test_background_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plate.mbd");

    let mut editor = project_editor();
    let state = editor.project_state();

    assert!(editor.store.spawn_save(path.clone(), &state));
    // Single flight: a second request is refused until the first is polled
    assert!(!editor.store.spawn_save(path.clone(), &state));

    let deadline = Instant::now() + Duration::from_secs(10);
    let saved = loop {
        if let Some(result) = editor.store.poll_save() {
            break result;
        }
        assert!(Instant::now() < deadline, "background save never finished");
        std::thread::sleep(Duration::from_millis(5));
    };
    saved.unwrap();

    assert!(editor.store.spawn_load(path.clone()));
    let loaded = loop {
        if let Some(result) = editor.store.poll_load() {
            break result;
        }
        assert!(Instant::now() < deadline, "background load never finished");
        std::thread::sleep(Duration::from_millis(5));
    };
    let (state, report) = loaded.unwrap();
    assert!(report.is_clean());
    assert_eq!(state.marks.len(), 3);

    let mut fresh = MarkEditor::new();
    fresh.apply_project_state(state);
    assert_eq!(fresh.registry.selected(), Some(1));
    assert_eq!(fresh.view.zoom(), 2.5);
}

#[test]
fn test_poll_without_spawn_returns_none() {
    let mut editor = MarkEditor::new();
    assert!(editor.store.poll_save().is_none());
    assert!(editor.store.poll_load().is_none());
}
