use crate::app::{AppMode, AppState};
use crate::model::{LabelField, NodePatch};
use crate::mutation;

// The cursor counts chars, not bytes.
fn byte_index(buffer: &str, cursor_pos: usize) -> usize {
    buffer
        .char_indices()
        .nth(cursor_pos)
        .map(|(i, _)| i)
        .unwrap_or(buffer.len())
}

pub fn start_editing(app: &mut AppState, field: LabelField) {
    let Some(node) = app.selected_node() else {
        app.set_message("Select a node to edit");
        return;
    };
    let buffer = field.read(node).unwrap_or_default().to_string();
    let cursor_pos = buffer.chars().count();
    app.mode = AppMode::EditLabel {
        field,
        buffer,
        cursor_pos,
    };
}

pub fn type_char(app: &mut AppState, c: char) {
    if let AppMode::EditLabel {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        let at = byte_index(buffer, *cursor_pos);
        buffer.insert(at, c);
        *cursor_pos += 1;
    }
}

pub fn backspace(app: &mut AppState) {
    if let AppMode::EditLabel {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos > 0 {
            *cursor_pos -= 1;
            let at = byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn delete_char(app: &mut AppState) {
    if let AppMode::EditLabel {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < buffer.chars().count() {
            let at = byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn move_cursor_left(app: &mut AppState) {
    if let AppMode::EditLabel { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = cursor_pos.saturating_sub(1);
    }
}

pub fn move_cursor_right(app: &mut AppState) {
    if let AppMode::EditLabel {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < buffer.chars().count() {
            *cursor_pos += 1;
        }
    }
}

pub fn move_cursor_home(app: &mut AppState) {
    if let AppMode::EditLabel { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = 0;
    }
}

pub fn move_cursor_end(app: &mut AppState) {
    if let AppMode::EditLabel {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        *cursor_pos = buffer.chars().count();
    }
}

/// Writes the buffer to the selected node. Returns the field that was edited.
fn commit(app: &mut AppState) -> Option<LabelField> {
    let AppMode::EditLabel { field, buffer, .. } =
        std::mem::replace(&mut app.mode, AppMode::Normal)
    else {
        return None;
    };
    let node = app.selected_node()?;
    let id = node.id.clone();

    let value = buffer.trim();
    if field.read(node).unwrap_or_default() != value {
        app.push_history();
        mutation::update_node(&mut app.doc, &id, &NodePatch::label(field, value));
        app.touch();
        app.set_message(format!("{id}: {} updated", field.name()));
    }
    Some(field)
}

pub fn confirm_edit(app: &mut AppState) {
    commit(app);
}

/// Commits the current field and opens the next one.
pub fn next_field(app: &mut AppState) {
    if let Some(field) = commit(app) {
        let pos = LabelField::ALL.iter().position(|f| *f == field).unwrap_or(0);
        let next = LabelField::ALL[(pos + 1) % LabelField::ALL.len()];
        start_editing(app, next);
    }
}

pub fn cancel_edit(app: &mut AppState) {
    if matches!(app.mode, AppMode::EditLabel { .. }) {
        app.mode = AppMode::Normal;
    }
}
