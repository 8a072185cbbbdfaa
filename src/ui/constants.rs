use ratatui::style::Style;

// Type aliases for clarity
pub type CharBuffer = Vec<Vec<char>>;
pub type StyleBuffer = Vec<Vec<Style>>;
pub type LinkBuffer = Vec<Vec<u8>>;

pub const CURSOR_INDICATOR: char = '▌';
pub const STATUS_EDIT_PREFIX: &str = "Edit";

/// Marks the cell covered by the right half of a double-width glyph.
pub const WIDE_CONTINUATION: char = '\0';

/// Cells kept between the selection and the terminal edge when scrolling.
pub const FOLLOW_MARGIN_X: f64 = 4.0;
pub const FOLLOW_MARGIN_Y: f64 = 2.0;

/// Outline pane width, and the narrowest board it may leave beside it.
pub const OUTLINE_WIDTH: u16 = 28;
pub const OUTLINE_MIN_BOARD_WIDTH: u16 = 40;

// Link directions, combined as a bit set per cell
pub mod link {
    pub const UP: u8 = 1;
    pub const DOWN: u8 = 2;
    pub const LEFT: u8 = 4;
    pub const RIGHT: u8 = 8;
}

// Box and junction characters
pub mod junction {
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
    pub const TOP_CORNER: char = '╭';
    pub const BOTTOM_CORNER: char = '╰';
    pub const TOP_RIGHT: char = '╮';
    pub const BOTTOM_RIGHT: char = '╯';
    pub const MIDDLE_RIGHT: char = '┤';
    pub const MIDDLE_LEFT: char = '├';
    pub const CROSS: char = '┼';
    pub const TOP_TEE: char = '┬';
    pub const BOTTOM_TEE: char = '┴';
}

// Node boxes use square corners so they read apart from the rounded links
pub mod frame {
    pub const TOP_LEFT: char = '┌';
    pub const TOP_RIGHT: char = '┐';
    pub const BOTTOM_LEFT: char = '└';
    pub const BOTTOM_RIGHT: char = '┘';
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
}
