mod board;
mod canvas;
mod constants;
mod help;
mod outline;
mod status_line;


use crate::app::{AppMode, AppState};
use crate::layout::LayoutMode;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use board::{fit_to_width, follow_selection, BoardRenderer, CellMapper};
pub use canvas::{link_glyph, BufferCanvas};
use constants::{OUTLINE_MIN_BOARD_WIDTH, OUTLINE_WIDTH};
use help::HelpRenderer;
use outline::OutlineRenderer;
use status_line::StatusLineRenderer;

// Main render function
pub fn render(frame: &mut Frame, app: &mut AppState) {
    // Update terminal size
    let size = frame.area();
    app.terminal_width = size.width;
    app.terminal_height = size.height;

    // Create main layout chunks
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    // Render based on mode
    if matches!(app.mode, AppMode::Help) {
        HelpRenderer::render(frame, chunks[0]);
    } else {
        let mode = if matches!(app.mode, AppMode::Preview) {
            LayoutMode::Export
        } else {
            LayoutMode::Edit
        };
        let board_area = if app.show_outline
            && mode == LayoutMode::Edit
            && chunks[0].width >= OUTLINE_WIDTH + OUTLINE_MIN_BOARD_WIDTH
        {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(OUTLINE_WIDTH), Constraint::Min(1)])
                .split(chunks[0]);
            OutlineRenderer::render(frame, app, panes[0]);
            panes[1]
        } else {
            chunks[0]
        };

        let layout = app.layout(mode);
        follow_selection(app, &layout, board_area);
        BoardRenderer::new(app, &layout).render(frame, board_area);
    }

    // Render status line
    StatusLineRenderer::render(frame, app, chunks[1]);
}
