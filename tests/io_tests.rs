mod common;

use orbat_rs::io::{load_export_file, parse_orbat_export_str, save_export_file, ImportError};
use orbat_rs::model::UnitKind;
use orbat_rs::theme::ColorPresetId;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_sample_export_imports() {
    let file = parse_orbat_export_str(common::SAMPLE_EXPORT).unwrap();
    assert_eq!(file.meta.exported_at, "2025-03-01T12:00:00.000Z");
    assert_eq!(file.state.color_preset_id, ColorPresetId::P2);
    assert_eq!(file.state.init_params.units_per_lead, 2);

    let doc = file.state.doc();
    assert_eq!(doc.len(), 4);
    assert_eq!(doc.get("L1").unwrap().kind, UnitKind::Hq);
    assert_eq!(doc.get("U1").unwrap().label_top.as_deref(), Some("A & B"));
    assert_eq!(doc.parent_of("S1"), Some("U1"));
}

#[test]
fn test_import_into_session_applies_order_and_view() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample.json");
    fs::write(&path, common::SAMPLE_EXPORT).unwrap();

    let mut app = common::create_test_app();
    app.load_file(&path).unwrap();

    assert_eq!(app.selected_id.as_deref(), Some("U1"));
    assert_eq!(app.scale, 0.9);
    assert_eq!(app.color_preset, ColorPresetId::P2);
    assert!(!app.is_dirty);

    // The stored order puts U2 left of U1.
    let layout = app.layout(orbat_rs::LayoutMode::Edit);
    assert!(layout.slot("U2").unwrap().x < layout.slot("U1").unwrap().x);
}

#[test]
fn test_save_then_load_keeps_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roundtrip.json");

    let mut app = common::create_test_app();
    app.select("U2");
    app.save_to(&path).unwrap();

    let loaded = load_export_file(&path).unwrap();
    assert_eq!(loaded.version, 1);
    assert_eq!(loaded.state, app.editor_state());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("}\n"));
    assert!(text.contains("\n  \"version\": 1,"));
}

#[test]
fn test_rejected_import_keeps_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    let broken = common::SAMPLE_EXPORT.replace("\"scale\": 0.9", "\"scale\": \"big\"");
    fs::write(&path, broken).unwrap();

    let mut app = common::create_test_app();
    let before = app.doc.clone();
    let err = app.load_file(&path).unwrap_err();
    assert!(err.to_string().contains("scale"));
    assert_eq!(app.doc, before);
}

#[test]
fn test_wrong_version_is_reported() {
    let text = common::SAMPLE_EXPORT.replace("\"version\": 1", "\"version\": 3");
    match parse_orbat_export_str(&text) {
        Err(ImportError::UnsupportedVersion(v)) => assert_eq!(v, 3),
        other => panic!("expected version error, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = load_export_file(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(ImportError::Io(_))));
}

#[test]
fn test_save_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("board.json");
    fs::write(&path, "x".repeat(10_000)).unwrap();

    let app = common::create_test_app();
    save_export_file(&app.export_file(), &path).unwrap();
    assert!(load_export_file(&path).is_ok());
}
