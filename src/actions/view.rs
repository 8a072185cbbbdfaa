use crate::app::{AppMode, AppState};
use crate::config::SCALE_STEP;

fn zoom_by(app: &mut AppState, delta: f64) {
    let before = app.scale;
    app.set_scale(app.scale + delta);
    if app.scale == before {
        app.set_message(format!("Zoom limit reached ({:.0}%)", app.scale * 100.0));
    } else {
        app.set_message(format!("Zoom {:.0}%", app.scale * 100.0));
    }
}

pub fn zoom_in(app: &mut AppState) {
    zoom_by(app, SCALE_STEP);
}

pub fn zoom_out(app: &mut AppState) {
    zoom_by(app, -SCALE_STEP);
}

/// The preset is part of the saved state, so switching it dirties the session.
pub fn cycle_color_preset(app: &mut AppState) {
    app.color_preset = app.color_preset.next();
    app.is_dirty = true;
    app.set_message(format!("Colors: {}", app.color_preset.label()));
}

pub fn toggle_preview(app: &mut AppState) {
    app.mode = match app.mode {
        AppMode::Preview => AppMode::Normal,
        _ => {
            app.set_message("Export preview - p or Esc to return");
            AppMode::Preview
        }
    };
}

pub fn toggle_outline(app: &mut AppState) {
    app.show_outline = !app.show_outline;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, MAX_SCALE, MIN_SCALE};
    use crate::theme::ColorPresetId;

    fn create_test_app() -> AppState {
        AppState::new(AppConfig::default())
    }

    #[test]
    fn test_zoom_steps_and_clamps() {
        let mut app = create_test_app();
        zoom_in(&mut app);
        assert_eq!(app.scale, 1.05);
        assert_eq!(app.message.as_deref(), Some("Zoom 105%"));

        for _ in 0..20 {
            zoom_in(&mut app);
        }
        assert_eq!(app.scale, MAX_SCALE);
        assert!(app.message.as_deref().unwrap().starts_with("Zoom limit"));

        for _ in 0..40 {
            zoom_out(&mut app);
        }
        assert_eq!(app.scale, MIN_SCALE);
    }

    #[test]
    fn test_cycle_color_preset() {
        let mut app = create_test_app();
        assert_eq!(app.color_preset, ColorPresetId::P1);
        cycle_color_preset(&mut app);
        assert_eq!(app.color_preset, ColorPresetId::P2);
        assert!(app.is_dirty);
        cycle_color_preset(&mut app);
        cycle_color_preset(&mut app);
        assert_eq!(app.color_preset, ColorPresetId::P1);
    }

    #[test]
    fn test_toggle_preview() {
        let mut app = create_test_app();
        toggle_preview(&mut app);
        assert_eq!(app.mode, AppMode::Preview);
        toggle_preview(&mut app);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_toggle_outline() {
        let mut app = create_test_app();
        assert!(app.show_outline);
        toggle_outline(&mut app);
        assert!(!app.show_outline);
        toggle_outline(&mut app);
        assert!(app.show_outline);
    }
}
