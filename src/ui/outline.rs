use super::board::fit_to_width;
use crate::app::AppState;
use crate::model::{NodeLevel, OrbatNode};
use crate::tree;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const DRAG_MARKER: &str = "» ";

fn level_badge(level: NodeLevel) -> &'static str {
    match level {
        NodeLevel::Lead => "PL",
        NodeLevel::Unit => "U",
        NodeLevel::Sub => "SU",
    }
}

/// Short name for a row: the first label that is set, falling back to the id.
fn row_label(node: &OrbatNode) -> &str {
    node.display_id
        .as_deref()
        .or(node.label_main.as_deref())
        .or(node.label_bottom.as_deref())
        .or(node.label_top.as_deref())
        .unwrap_or(&node.id)
}

// Hierarchy outline shown beside the board
pub struct OutlineRenderer;

impl OutlineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Outline ");
        let inner = block.inner(area);
        let (lines, selected_row) = Self::build_lines(app, inner.width as usize);

        // Keep the selected row on screen.
        let height = inner.height as usize;
        let offset = match selected_row {
            Some(row) if height > 0 && row >= height => row + 1 - height,
            _ => 0,
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((offset as u16, 0));
        frame.render_widget(paragraph, area);
    }

    /// One line per reachable node, plus the index of the selected row.
    pub fn build_lines(app: &AppState, width: usize) -> (Vec<Line<'static>>, Option<usize>) {
        let dragged = app.drag.as_ref().map(|d| d.dragged_id.as_str());
        let selected = app.selected_id.as_deref();
        let mut selected_row = None;

        let lines = tree::outline(&app.doc)
            .into_iter()
            .enumerate()
            .filter_map(|(row, (id, depth))| {
                let node = app.doc.get(&id)?;
                let is_dragged = dragged == Some(id.as_str());
                let is_selected = selected == Some(id.as_str());
                if is_selected {
                    selected_row = Some(row);
                }

                let marker = if is_dragged { DRAG_MARKER } else { "" };
                let text = format!(
                    "{}{marker}{} {}",
                    "  ".repeat(depth),
                    level_badge(node.level),
                    row_label(node)
                );

                let style = if is_dragged {
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD)
                } else if is_selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else if node.level == NodeLevel::Lead {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                Some(Line::from(Span::styled(fit_to_width(&text, width), style)))
            })
            .collect();

        (lines, selected_row)
    }
}
