use crate::actions::{Action, InitParam};
use crate::app::{AppMode, AppState};
use crate::model::LabelField;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

pub fn handle_events(app: &mut AppState) -> Result<Option<Action>> {
    if event::poll(Duration::from_millis(10))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(handle_key_event(app, key));
            }
        }
    }
    Ok(None)
}

pub fn handle_key_event(app: &AppState, key: KeyEvent) -> Option<Action> {
    match &app.mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::EditLabel { .. } => handle_editing_mode(key),
        AppMode::Help => handle_help_mode(key),
        AppMode::Preview => handle_preview_mode(key),
    }
}

fn handle_normal_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        // Quit
        (Char('q'), KeyModifiers::NONE) => Some(Action::Quit),
        (Char('Q'), KeyModifiers::SHIFT) => Some(Action::ForceQuit),
        (Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),

        // Reorder (must come before general arrow key handling)
        (Char('H'), KeyModifiers::SHIFT) | (Left, KeyModifiers::SHIFT) => {
            Some(Action::MoveSelectedLeft)
        }
        (Char('L'), KeyModifiers::SHIFT) | (Right, KeyModifiers::SHIFT) => {
            Some(Action::MoveSelectedRight)
        }

        // Movement
        (Char('h'), KeyModifiers::NONE) | (Left, _) => Some(Action::GoLeft),
        (Char('j'), KeyModifiers::NONE) | (Down, _) => Some(Action::GoDown),
        (Char('k'), KeyModifiers::NONE) | (Up, _) => Some(Action::GoUp),
        (Char('l'), KeyModifiers::NONE) | (Right, _) => Some(Action::GoRight),
        (Char('m'), KeyModifiers::NONE) | (Home, _) => Some(Action::GoToFirstLead),
        (Tab, KeyModifiers::NONE) => Some(Action::NextInOutline),
        (BackTab, _) => Some(Action::PrevInOutline),

        // Structure
        (Char('n'), KeyModifiers::NONE) => Some(Action::AddLead),
        (Char('a'), KeyModifiers::NONE) => Some(Action::AddUnit),
        (Char('A'), KeyModifiers::SHIFT) => Some(Action::AddSub),
        (Char('d'), KeyModifiers::NONE) | (Delete, _) => Some(Action::DeleteSelected),
        (Char('g'), KeyModifiers::NONE) | (Char(' '), KeyModifiers::NONE) => {
            Some(Action::GrabOrDrop)
        }
        (Esc, _) => Some(Action::CancelDrag),
        (Char('t'), KeyModifiers::NONE) => Some(Action::CycleKindForward),
        (Char('T'), KeyModifiers::SHIFT) => Some(Action::CycleKindBack),

        // Labels
        (Char('e'), KeyModifiers::NONE) | (Enter, KeyModifiers::NONE) => {
            Some(Action::EditLabel(LabelField::Main))
        }
        (Char('E'), KeyModifiers::SHIFT) => Some(Action::EditLabel(LabelField::Top)),
        (Char('b'), KeyModifiers::NONE) => Some(Action::EditLabel(LabelField::Bottom)),
        (Char('i'), KeyModifiers::NONE) => Some(Action::EditLabel(LabelField::DisplayId)),

        // Generation
        (Char(']'), _) => Some(Action::AdjustInitParam(InitParam::Leads, 1)),
        (Char('['), _) => Some(Action::AdjustInitParam(InitParam::Leads, -1)),
        (Char('}'), _) => Some(Action::AdjustInitParam(InitParam::Units, 1)),
        (Char('{'), _) => Some(Action::AdjustInitParam(InitParam::Units, -1)),
        (Char(')'), _) => Some(Action::AdjustInitParam(InitParam::Subs, 1)),
        (Char('('), _) => Some(Action::AdjustInitParam(InitParam::Subs, -1)),
        (Char('R'), KeyModifiers::SHIFT) => Some(Action::ApplyPreset),

        // View
        (Char('+'), _) | (Char('='), KeyModifiers::NONE) => Some(Action::ZoomIn),
        (Char('-'), KeyModifiers::NONE) => Some(Action::ZoomOut),
        (Char('c'), KeyModifiers::NONE) => Some(Action::CycleColorPreset),
        (Char('p'), KeyModifiers::NONE) => Some(Action::TogglePreview),
        (Char('o'), KeyModifiers::NONE) => Some(Action::ToggleOutline),

        // File operations
        (Char('s'), KeyModifiers::NONE) => Some(Action::Save),
        (Char('x'), KeyModifiers::NONE) => Some(Action::ExportSvg),
        (Char('r'), KeyModifiers::NONE) => Some(Action::Reload),

        // Clipboard
        (Char('y'), KeyModifiers::NONE) => Some(Action::CopyJson),

        // Undo/Redo
        (Char('u'), KeyModifiers::NONE) => Some(Action::Undo),
        (Char('r'), KeyModifiers::CONTROL) => Some(Action::Redo),

        // Help
        (Char('?'), _) => Some(Action::ShowHelp),

        _ => None,
    }
}

fn handle_editing_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Esc, _) => Some(Action::CancelEdit),
        (Enter, _) => Some(Action::ConfirmEdit),
        (Tab, _) => Some(Action::NextEditField),
        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(Action::TypeChar(c)),

        // Deletion
        (Backspace, _) => Some(Action::Backspace),
        (Delete, _) => Some(Action::Delete),

        // Movement
        (Left, _) => Some(Action::MoveCursorLeft),
        (Right, _) => Some(Action::MoveCursorRight),
        (Home, _) => Some(Action::MoveCursorHome),
        (End, _) => Some(Action::MoveCursorEnd),
        (Char('a'), KeyModifiers::CONTROL) => Some(Action::MoveCursorHome),
        (Char('e'), KeyModifiers::CONTROL) => Some(Action::MoveCursorEnd),

        _ => None,
    }
}

fn handle_help_mode(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseHelp),
        _ => None,
    }
}

fn handle_preview_mode(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('p') => Some(Action::TogglePreview),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::ZoomIn),
        KeyCode::Char('-') => Some(Action::ZoomOut),
        KeyCode::Char('c') => Some(Action::CycleColorPreset),
        KeyCode::Char('x') => Some(Action::ExportSvg),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn create_test_app() -> AppState {
        AppState::new(AppConfig::default())
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_normal_mode_keys() {
        let app = create_test_app();
        let cases = [
            (key(KeyCode::Char('j'), KeyModifiers::NONE), Action::GoDown),
            (key(KeyCode::Left, KeyModifiers::NONE), Action::GoLeft),
            (key(KeyCode::Left, KeyModifiers::SHIFT), Action::MoveSelectedLeft),
            (key(KeyCode::Char('L'), KeyModifiers::SHIFT), Action::MoveSelectedRight),
            (key(KeyCode::Char('A'), KeyModifiers::SHIFT), Action::AddSub),
            (key(KeyCode::Tab, KeyModifiers::NONE), Action::NextInOutline),
            (key(KeyCode::BackTab, KeyModifiers::SHIFT), Action::PrevInOutline),
            (key(KeyCode::Char('o'), KeyModifiers::NONE), Action::ToggleOutline),
            (key(KeyCode::Char('r'), KeyModifiers::CONTROL), Action::Redo),
            (key(KeyCode::Char('r'), KeyModifiers::NONE), Action::Reload),
            (
                key(KeyCode::Char('}'), KeyModifiers::SHIFT),
                Action::AdjustInitParam(InitParam::Units, 1),
            ),
            (
                key(KeyCode::Char('i'), KeyModifiers::NONE),
                Action::EditLabel(LabelField::DisplayId),
            ),
        ];
        for (event, expected) in cases {
            assert_eq!(handle_key_event(&app, event), Some(expected), "{event:?}");
        }
        assert_eq!(handle_key_event(&app, key(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_editing_mode_types_letters() {
        let mut app = create_test_app();
        app.mode = AppMode::EditLabel {
            field: LabelField::Main,
            buffer: String::new(),
            cursor_pos: 0,
        };

        assert_eq!(
            handle_key_event(&app, key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::TypeChar('q'))
        );
        assert_eq!(
            handle_key_event(&app, key(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Action::NextEditField)
        );
        assert_eq!(
            handle_key_event(&app, key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::CancelEdit)
        );
    }

    #[test]
    fn test_preview_and_help_modes() {
        let mut app = create_test_app();
        app.mode = AppMode::Preview;
        assert_eq!(
            handle_key_event(&app, key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::TogglePreview)
        );
        assert_eq!(handle_key_event(&app, key(KeyCode::Char('d'), KeyModifiers::NONE)), None);

        app.mode = AppMode::Help;
        assert_eq!(
            handle_key_event(&app, key(KeyCode::Char('?'), KeyModifiers::NONE)),
            Some(Action::CloseHelp)
        );
    }
}
