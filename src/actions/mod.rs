mod clipboard;
mod editing;
mod file;
mod help;
mod history;
mod movement;
mod node;
mod view;

use crate::app::AppState;
use crate::model::LabelField;
use anyhow::Result;

// Re-export all public functions from submodules
pub use clipboard::*;
pub use editing::*;
pub use file::*;
pub use help::*;
pub use history::*;
pub use movement::*;
pub use node::*;
pub use view::*;

/// Which generation parameter an adjust action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitParam {
    Leads,
    Units,
    Subs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Application control
    Quit,
    ForceQuit,

    // Movement
    GoUp,
    GoDown,
    GoLeft,
    GoRight,
    GoToFirstLead,
    NextInOutline,
    PrevInOutline,

    // Structure
    AddLead,
    AddUnit,
    AddSub,
    DeleteSelected,
    MoveSelectedLeft,
    MoveSelectedRight,
    GrabOrDrop,
    CancelDrag,
    CycleKindForward,
    CycleKindBack,

    // Label editing
    EditLabel(LabelField),
    TypeChar(char),
    Backspace,
    Delete,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorHome,
    MoveCursorEnd,
    NextEditField,
    ConfirmEdit,
    CancelEdit,

    // Generation
    AdjustInitParam(InitParam, i32),
    ApplyPreset,

    // View
    ZoomIn,
    ZoomOut,
    CycleColorPreset,
    TogglePreview,
    ToggleOutline,

    // File
    Save,
    ExportSvg,
    Reload,

    // Clipboard
    CopyJson,

    // Undo/Redo
    Undo,
    Redo,

    // Help
    ShowHelp,
    CloseHelp,
}

pub fn execute_action(action: Action, app: &mut AppState) -> Result<()> {
    match action {
        Action::Quit => {
            if app.is_dirty {
                app.set_message("Unsaved changes! Press Shift+Q to force quit or 's' to save");
            } else {
                app.running = false;
            }
        }
        Action::ForceQuit => {
            app.running = false;
        }

        // Movement
        Action::GoUp => movement::go_up(app),
        Action::GoDown => movement::go_down(app),
        Action::GoLeft => movement::go_left(app),
        Action::GoRight => movement::go_right(app),
        Action::GoToFirstLead => movement::go_to_first_lead(app),
        Action::NextInOutline => movement::go_next_in_outline(app),
        Action::PrevInOutline => movement::go_prev_in_outline(app),

        // Structure
        Action::AddLead => node::add_lead(app),
        Action::AddUnit => node::add_unit(app),
        Action::AddSub => node::add_sub(app),
        Action::DeleteSelected => node::delete_selected(app),
        Action::MoveSelectedLeft => node::move_selected(app, -1),
        Action::MoveSelectedRight => node::move_selected(app, 1),
        Action::GrabOrDrop => node::grab_or_drop(app),
        Action::CancelDrag => node::cancel_drag(app),
        Action::CycleKindForward => node::cycle_kind(app, true),
        Action::CycleKindBack => node::cycle_kind(app, false),

        // Label editing
        Action::EditLabel(field) => editing::start_editing(app, field),
        Action::TypeChar(c) => editing::type_char(app, c),
        Action::Backspace => editing::backspace(app),
        Action::Delete => editing::delete_char(app),
        Action::MoveCursorLeft => editing::move_cursor_left(app),
        Action::MoveCursorRight => editing::move_cursor_right(app),
        Action::MoveCursorHome => editing::move_cursor_home(app),
        Action::MoveCursorEnd => editing::move_cursor_end(app),
        Action::NextEditField => editing::next_field(app),
        Action::ConfirmEdit => editing::confirm_edit(app),
        Action::CancelEdit => editing::cancel_edit(app),

        // Generation
        Action::AdjustInitParam(param, delta) => node::adjust_init_param(app, param, delta),
        Action::ApplyPreset => node::apply_preset(app),

        // View
        Action::ZoomIn => view::zoom_in(app),
        Action::ZoomOut => view::zoom_out(app),
        Action::CycleColorPreset => view::cycle_color_preset(app),
        Action::TogglePreview => view::toggle_preview(app),
        Action::ToggleOutline => view::toggle_outline(app),

        // File
        Action::Save => file::save(app)?,
        Action::ExportSvg => file::export_svg(app)?,
        Action::Reload => file::reload(app)?,

        // Clipboard
        Action::CopyJson => clipboard::copy_json(app)?,

        // Undo/Redo
        Action::Undo => history::undo(app),
        Action::Redo => history::redo(app),

        // Help
        Action::ShowHelp => help::show_help(app),
        Action::CloseHelp => help::close_help(app),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn create_test_app() -> AppState {
        AppState::new(AppConfig::default())
    }

    #[test]
    fn test_quit_with_unsaved_changes() {
        let mut app = create_test_app();
        execute_action(Action::AddLead, &mut app).unwrap();
        assert!(app.is_dirty);

        execute_action(Action::Quit, &mut app).unwrap();
        assert!(app.running);
        assert!(app.message.as_deref().unwrap().contains("Unsaved changes"));

        execute_action(Action::ForceQuit, &mut app).unwrap();
        assert!(!app.running);
    }

    #[test]
    fn test_quit_when_clean() {
        let mut app = create_test_app();
        execute_action(Action::Quit, &mut app).unwrap();
        assert!(!app.running);
    }

    #[test]
    fn test_dispatch_roundtrip_through_history() {
        let mut app = create_test_app();
        execute_action(Action::GoDown, &mut app).unwrap();
        execute_action(Action::AddSub, &mut app).unwrap();
        assert!(app.doc.contains("S1"));

        execute_action(Action::Undo, &mut app).unwrap();
        assert!(!app.doc.contains("S1"));
        execute_action(Action::Redo, &mut app).unwrap();
        assert!(app.doc.contains("S1"));
    }
}
