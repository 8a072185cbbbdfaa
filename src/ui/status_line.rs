use crate::app::{AppMode, AppState};
use crate::model::LabelField;
use crate::ui::constants::{CURSOR_INDICATOR, STATUS_EDIT_PREFIX};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Wrap},
    Frame,
};

// Status line renderer
pub struct StatusLineRenderer;

impl StatusLineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let (content, style) = Self::get_content_and_style(app, area);

        let paragraph = Paragraph::new(content)
            .style(style)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    pub fn get_content_and_style(app: &AppState, area: Rect) -> (String, Style) {
        match &app.mode {
            AppMode::Normal | AppMode::Preview => Self::render_normal_mode(app),
            AppMode::EditLabel {
                field,
                buffer,
                cursor_pos,
            } => Self::render_edit_mode(*field, buffer, *cursor_pos, area.width),
            AppMode::Help => Self::render_help_mode(),
        }
    }

    fn summary(app: &AppState) -> String {
        let selection = match app.selected_node() {
            Some(node) => format!("{} ({})", node.id, node.level),
            None => "-".to_string(),
        };
        let file = app
            .filename
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "[new]".to_string());
        let dirty = if app.is_dirty { "*" } else { "" };
        let preview = if app.mode == AppMode::Preview {
            "PREVIEW | "
        } else {
            ""
        };

        format!(
            "orbat-rs | {preview}{} nodes | {selection} | {:.0}% | {} | {file}{dirty}",
            app.doc.len(),
            app.scale * 100.0,
            app.color_preset.label(),
        )
    }

    fn render_normal_mode(app: &AppState) -> (String, Style) {
        let content = match app.message {
            Some(ref msg) => msg.clone(),
            None => Self::summary(app),
        };

        let style = if app.message.is_some() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray).bg(Color::Black)
        };

        (content, style)
    }

    fn render_edit_mode(
        field: LabelField,
        buffer: &str,
        cursor_pos: usize,
        width: u16,
    ) -> (String, Style) {
        let prefix = format!("{STATUS_EDIT_PREFIX} {}: ", field.name());
        let chars: Vec<char> = buffer.chars().collect();

        // Scroll the visible window so the cursor stays on screen
        let available_width =
            (width as usize).saturating_sub(prefix.chars().count() + 1);
        let text_start = if cursor_pos > available_width.saturating_sub(10) {
            cursor_pos.saturating_sub(available_width / 2)
        } else {
            0
        };
        let text_end = (text_start + available_width).min(chars.len());
        let text_start = text_start.min(text_end);

        let mut display = prefix;
        let cursor = cursor_pos.clamp(text_start, text_end);
        display.extend(&chars[text_start..cursor]);
        display.push(CURSOR_INDICATOR);
        display.extend(&chars[cursor..text_end]);

        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        (display, style)
    }

    fn render_help_mode() -> (String, Style) {
        let content = String::from("Press ESC or q to close help");
        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        (content, style)
    }
}
