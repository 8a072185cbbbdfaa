use crate::app::AppState;
use crate::errors::OrbatError;
use anyhow::Result;
use clipboard::{ClipboardContext, ClipboardProvider};
use tracing::warn;

fn set_clipboard(text: String) -> Result<(), OrbatError> {
    let mut ctx = ClipboardContext::new().map_err(|e| OrbatError::Clipboard(e.to_string()))?;
    ctx.set_contents(text)
        .map_err(|e| OrbatError::Clipboard(e.to_string()))
}

/// Copies the export file for the current document to the system clipboard.
/// A missing clipboard is reported in the status line, not as an error.
pub fn copy_json(app: &mut AppState) -> Result<()> {
    let json = app.export_file().to_json_pretty()?;
    let bytes = json.len();
    match set_clipboard(json) {
        Ok(()) => app.set_message(format!("Copied export JSON ({bytes} bytes)")),
        Err(e) => {
            warn!(error = %e, "clipboard unavailable");
            app.set_message(format!("{e}"));
        }
    }
    Ok(())
}
