use crate::app::AppState;
use crate::layout::{BoardLayout, Point, Slot};
use crate::links::{drawable_polylines, ORTHOGONAL_EPS};
use crate::model::OrbatNode;
use crate::theme::hex_to_color;
use crate::ui::canvas::BufferCanvas;
use crate::ui::constants::{frame, FOLLOW_MARGIN_X, FOLLOW_MARGIN_Y};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cuts `text` to at most `max` display cells, marking the cut with '…'.
pub fn fit_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Maps logical board pixels to terminal cells for the current zoom and scroll.
#[derive(Debug, Clone, Copy)]
pub struct CellMapper {
    pub cell_w: f64,
    pub cell_h: f64,
    pub left: f64,
    pub top: f64,
}

impl CellMapper {
    pub fn new(app: &AppState) -> Self {
        let (cell_w, cell_h) = app.cell_size();
        Self {
            cell_w,
            cell_h,
            left: app.viewport_left,
            top: app.viewport_top,
        }
    }

    pub fn point(&self, p: Point) -> (i32, i32) {
        self.xy(p.x, p.y)
    }

    pub fn xy(&self, x: f64, y: f64) -> (i32, i32) {
        (
            (x / self.cell_w - self.left).round() as i32,
            (y / self.cell_h - self.top).round() as i32,
        )
    }

    /// Inclusive cell corners of a slot; never narrower than 3x3.
    pub fn slot_rect(&self, slot: &Slot) -> ((i32, i32), (i32, i32)) {
        let (x0, y0) = self.xy(slot.x, slot.y);
        let (x1, y1) = self.xy(slot.right(), slot.bottom());
        ((x0, y0), (x1.max(x0 + 2), y1.max(y0 + 2)))
    }
}

/// Scrolls the viewport so the selected slot stays on screen.
pub fn follow_selection(app: &mut AppState, layout: &BoardLayout, area: Rect) {
    let Some(slot) = app.selected_id.as_deref().and_then(|id| layout.slot(id)) else {
        return;
    };
    let (cell_w, cell_h) = app.cell_size();
    let (x0, y0) = (slot.x / cell_w, slot.y / cell_h);
    let (x1, y1) = (slot.right() / cell_w, slot.bottom() / cell_h);
    let (width, height) = (area.width as f64, area.height as f64);

    if x0 < app.viewport_left + FOLLOW_MARGIN_X {
        app.viewport_left = (x0 - FOLLOW_MARGIN_X).floor();
    } else if x1 > app.viewport_left + width - FOLLOW_MARGIN_X {
        app.viewport_left = (x1 + FOLLOW_MARGIN_X - width).ceil();
    }

    if y0 < app.viewport_top + FOLLOW_MARGIN_Y {
        app.viewport_top = (y0 - FOLLOW_MARGIN_Y).floor();
    } else if y1 > app.viewport_top + height - FOLLOW_MARGIN_Y {
        app.viewport_top = (y1 + FOLLOW_MARGIN_Y - height).ceil();
    }
}

// Board renderer
pub struct BoardRenderer<'a> {
    app: &'a AppState,
    layout: &'a BoardLayout,
    mapper: CellMapper,
}

impl<'a> BoardRenderer<'a> {
    pub fn new(app: &'a AppState, layout: &'a BoardLayout) -> Self {
        Self {
            app,
            layout,
            mapper: CellMapper::new(app),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let canvas = self.draw(area);
        let paragraph = Paragraph::new(canvas.to_lines());
        frame.render_widget(paragraph, area);
    }

    /// Paints links first so boxes cover the link ends.
    pub fn draw(&self, area: Rect) -> BufferCanvas {
        let mut canvas = BufferCanvas::new(area.width as usize, area.height as usize);
        self.draw_links(&mut canvas);

        let (left, top) = (self.mapper.left * self.mapper.cell_w, self.mapper.top * self.mapper.cell_h);
        let viewport = (
            left,
            top,
            left + area.width as f64 * self.mapper.cell_w,
            top + area.height as f64 * self.mapper.cell_h,
        );
        for slot in self.layout.visible_slots(viewport) {
            if let Some(node) = self.app.doc.get(&slot.id) {
                self.draw_node(&mut canvas, slot, node);
            }
        }
        canvas
    }

    fn colors(&self) -> (Color, Color) {
        let colors = self.app.color_preset.colors();
        (colors.bg_color(), colors.stroke_color())
    }

    fn draw_links(&self, canvas: &mut BufferCanvas) {
        let (_, stroke) = self.colors();
        let style = Style::default().fg(stroke);
        for (_, points) in drawable_polylines(&self.layout.slots, &self.layout.edges) {
            for pair in points.windows(2) {
                let from = self.mapper.point(pair[0]);
                let to = self.mapper.point(pair[1]);
                // Rounding can skew a short orthogonal hop; snap it back.
                let to = if (pair[0].x - pair[1].x).abs() <= ORTHOGONAL_EPS {
                    (from.0, to.1)
                } else {
                    (to.0, from.1)
                };
                canvas.draw_link(from, to, style);
            }
        }
    }

    fn border_style(&self, id: &str) -> Style {
        let (bg, stroke) = self.colors();
        let dragged = self.app.drag.as_ref().is_some_and(|d| d.dragged_id == id);
        let selected = self.app.selected_id.as_deref() == Some(id);

        if dragged {
            Style::default()
                .fg(Color::Magenta)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default()
                .fg(Color::Yellow)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(stroke).bg(bg)
        }
    }

    /// Label lines, most important last so short boxes drop from the front.
    fn node_lines(node: &OrbatNode) -> Vec<(String, Modifier)> {
        let mut lines = Vec::with_capacity(4);
        if let Some(top) = node.label_top.as_deref() {
            lines.push((top.to_string(), Modifier::empty()));
        }
        lines.push((node.kind.label().to_string(), Modifier::ITALIC));
        if let Some(main) = node.label_main.as_deref() {
            lines.push((main.to_string(), Modifier::BOLD));
        }
        let bottom = node.label_bottom.as_deref().unwrap_or(node.display_name());
        lines.push((bottom.to_string(), Modifier::empty()));
        lines
    }

    fn draw_node(&self, canvas: &mut BufferCanvas, slot: &Slot, node: &OrbatNode) {
        let ((x0, y0), (x1, y1)) = self.mapper.slot_rect(slot);
        let border = self.border_style(&slot.id);
        let (bg, _) = self.colors();
        let fill = Style::default().bg(bg);

        canvas.fill_rect(x0 + 1, y0 + 1, x1 - 1, y1 - 1, fill);
        for x in x0 + 1..x1 {
            canvas.set_char(x, y0, frame::HORIZONTAL, border);
            canvas.set_char(x, y1, frame::HORIZONTAL, border);
        }
        for y in y0 + 1..y1 {
            canvas.set_char(x0, y, frame::VERTICAL, border);
            canvas.set_char(x1, y, frame::VERTICAL, border);
        }
        canvas.set_char(x0, y0, frame::TOP_LEFT, border);
        canvas.set_char(x1, y0, frame::TOP_RIGHT, border);
        canvas.set_char(x0, y1, frame::BOTTOM_LEFT, border);
        canvas.set_char(x1, y1, frame::BOTTOM_RIGHT, border);

        let inner_w = (x1 - x0 - 1).max(0) as usize;
        let inner_h = (y1 - y0 - 1).max(0) as usize;
        let mut lines = Self::node_lines(node);
        if lines.len() > inner_h {
            let excess = lines.len() - inner_h;
            lines.drain(..excess);
        }

        let text_color = hex_to_color(self.app.color_preset.colors().shape);
        let first_row = y0 + 1 + ((inner_h - lines.len()) / 2) as i32;
        for (i, (text, modifier)) in lines.iter().enumerate() {
            let text = fit_to_width(text, inner_w);
            let pad = ((inner_w - text.width()) / 2) as i32;
            let style = fill.fg(text_color).add_modifier(*modifier);
            canvas.draw_styled_text(x0 + 1 + pad, first_row + i as i32, &text, style);
        }
    }
}
