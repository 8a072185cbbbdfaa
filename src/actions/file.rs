use crate::app::AppState;
use crate::svg;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_FILENAME: &str = "orbat.json";

pub fn save(app: &mut AppState) -> Result<()> {
    let path = app
        .filename
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILENAME));

    match app.save_to(&path) {
        Ok(()) => {
            app.set_message(format!("Saved to {}", path.display()));
            app.filename = Some(path);
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "save failed");
            app.set_message(format!("Failed to save: {e}"));
        }
    }
    Ok(())
}

/// Path of the SVG written next to the current document.
pub fn svg_path(app: &AppState) -> PathBuf {
    match &app.filename {
        Some(path) => path.with_extension("svg"),
        None => PathBuf::from("orbat.svg"),
    }
}

pub fn export_svg(app: &mut AppState) -> Result<()> {
    let path = svg_path(app);
    let markup = svg::export_svg(&app.doc, &app.config.layout, app.color_preset);

    match fs::write(&path, markup) {
        Ok(()) => {
            info!(path = %path.display(), "exported svg");
            app.set_message(format!("Exported {}", path.display()));
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "svg export failed");
            app.set_message(format!("Failed to export SVG: {e}"));
        }
    }
    Ok(())
}

/// Re-imports the current file. A rejected file leaves the session as it was.
pub fn reload(app: &mut AppState) -> Result<()> {
    let Some(path) = app.filename.clone() else {
        app.set_message("No file to reload");
        return Ok(());
    };

    match app.load_file(&path) {
        Ok(()) => app.set_message(format!("Loaded {}", path.display())),
        Err(e) => app.set_message(format!("Import rejected: {e}")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use tempfile::TempDir;

    fn create_test_app(dir: &TempDir) -> AppState {
        let mut app = AppState::new(AppConfig::default());
        app.filename = Some(dir.path().join("board.json"));
        app
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app(&dir);
        app.select("U3");
        app.push_history();
        crate::mutation::add_lead(&mut app.doc);
        app.touch();

        save(&mut app).unwrap();
        assert!(!app.is_dirty);
        assert!(app.message.as_deref().unwrap().starts_with("Saved to"));

        crate::mutation::delete_cascade(&mut app.doc, "L2");
        app.touch();
        reload(&mut app).unwrap();

        assert!(app.doc.contains("L2"));
        assert_eq!(app.selected_id.as_deref(), Some("U3"));
        assert!(!app.is_dirty);
        assert!(!app.can_undo());
    }

    #[test]
    fn test_rejected_reload_keeps_document() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app(&dir);
        fs::write(dir.path().join("board.json"), r#"{"version": 2}"#).unwrap();

        let before = app.doc.clone();
        reload(&mut app).unwrap();
        assert_eq!(app.doc, before);
        assert!(app.message.as_deref().unwrap().starts_with("Import rejected"));
    }

    #[test]
    fn test_export_svg_next_to_document() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app(&dir);
        export_svg(&mut app).unwrap();

        let written = fs::read_to_string(dir.path().join("board.svg")).unwrap();
        assert!(written.starts_with("<svg"));
        assert!(written.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_save_into_missing_directory_reports() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app(&dir);
        app.filename = Some(dir.path().join("nope").join("board.json"));
        app.touch();

        save(&mut app).unwrap();
        assert!(app.is_dirty);
        assert!(app.message.as_deref().unwrap().starts_with("Failed to save"));
    }
}
