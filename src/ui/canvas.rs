use crate::ui::constants::{junction, link, CharBuffer, LinkBuffer, StyleBuffer, WIDE_CONTINUATION};
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

/// Glyph for a cell whose links leave in the directions of `mask`.
pub fn link_glyph(mask: u8) -> char {
    use link::*;
    match mask {
        m if m == LEFT | RIGHT || m == LEFT || m == RIGHT => junction::HORIZONTAL,
        m if m == UP | DOWN || m == UP || m == DOWN => junction::VERTICAL,
        m if m == DOWN | RIGHT => junction::TOP_CORNER,
        m if m == DOWN | LEFT => junction::TOP_RIGHT,
        m if m == UP | RIGHT => junction::BOTTOM_CORNER,
        m if m == UP | LEFT => junction::BOTTOM_RIGHT,
        m if m == UP | DOWN | RIGHT => junction::MIDDLE_LEFT,
        m if m == UP | DOWN | LEFT => junction::MIDDLE_RIGHT,
        m if m == LEFT | RIGHT | DOWN => junction::TOP_TEE,
        m if m == LEFT | RIGHT | UP => junction::BOTTOM_TEE,
        0 => ' ',
        _ => junction::CROSS,
    }
}

// Buffer canvas for drawing characters and styles. Coordinates are signed so
// callers can draw shapes that start off-screen; out-of-range cells are dropped.
pub struct BufferCanvas {
    pub char_buffer: CharBuffer,
    pub style_buffer: StyleBuffer,
    link_buffer: LinkBuffer,
    pub width: usize,
    pub height: usize,
}

impl BufferCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            char_buffer: vec![vec![' '; width]; height],
            style_buffer: vec![vec![Style::default(); width]; height],
            link_buffer: vec![vec![0; width]; height],
            width,
            height,
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (y as usize) < self.height && (x as usize) < self.width
    }

    pub fn set_char(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if self.in_bounds(x, y) {
            let (x, y) = (x as usize, y as usize);
            self.char_buffer[y][x] = ch;
            self.style_buffer[y][x] = style;
        }
    }

    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, style: Style) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set_char(x, y, ' ', style);
            }
        }
    }

    /// Draws `text` starting at `x`, advancing by display width. Returns the
    /// number of cells used.
    pub fn draw_styled_text(&mut self, x: i32, y: i32, text: &str, style: Style) -> usize {
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            self.set_char(col, y, ch, style);
            if w == 2 {
                self.set_char(col + 1, y, WIDE_CONTINUATION, style);
            }
            col += w as i32;
        }
        (col - x) as usize
    }

    /// Adds link directions to a cell and redraws its glyph.
    pub fn add_link(&mut self, x: i32, y: i32, mask: u8, style: Style) {
        if self.in_bounds(x, y) {
            let cell = &mut self.link_buffer[y as usize][x as usize];
            *cell |= mask;
            let glyph = link_glyph(*cell);
            self.set_char(x, y, glyph, style);
        }
    }

    /// Draws an axis-aligned link segment. Diagonal input is ignored.
    pub fn draw_link(&mut self, from: (i32, i32), to: (i32, i32), style: Style) {
        let ((x0, y0), (x1, y1)) = (from, to);
        if y0 == y1 {
            let (lo, hi) = (x0.min(x1), x0.max(x1));
            for x in lo..=hi {
                let mut mask = 0;
                if x > lo {
                    mask |= link::LEFT;
                }
                if x < hi {
                    mask |= link::RIGHT;
                }
                self.add_link(x, y0, mask, style);
            }
        } else if x0 == x1 {
            let (lo, hi) = (y0.min(y1), y0.max(y1));
            for y in lo..=hi {
                let mut mask = 0;
                if y > lo {
                    mask |= link::UP;
                }
                if y < hi {
                    mask |= link::DOWN;
                }
                self.add_link(x0, y, mask, style);
            }
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();

        for (y, row) in self.char_buffer.iter().enumerate() {
            let mut spans = Vec::new();
            let mut current_style = Style::default();
            let mut current_text = String::new();

            for (x, &ch) in row.iter().enumerate() {
                if ch == WIDE_CONTINUATION {
                    continue;
                }
                let style = self.style_buffer[y][x];
                if style != current_style {
                    if !current_text.is_empty() {
                        spans.push(Span::styled(current_text.clone(), current_style));
                        current_text.clear();
                    }
                    current_style = style;
                }
                current_text.push(ch);
            }

            if !current_text.is_empty() {
                spans.push(Span::styled(current_text, current_style));
            }

            lines.push(Line::from(spans));
        }

        lines
    }
}
