use crate::app::AppState;

pub fn undo(app: &mut AppState) {
    if app.undo() {
        app.set_message("Undone");
    } else {
        app.set_message("Nothing to undo");
    }
}

pub fn redo(app: &mut AppState) {
    if app.redo() {
        app.set_message("Redone");
    } else {
        app.set_message("Nothing to redo");
    }
}
