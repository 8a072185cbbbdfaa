use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board color scheme identifiers, persisted as `p1`/`p2`/`p3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorPresetId {
    #[default]
    #[serde(rename = "p1")]
    P1,
    #[serde(rename = "p2")]
    P2,
    #[serde(rename = "p3")]
    P3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbatColors {
    pub bg: &'static str,
    pub stroke: &'static str,
    pub shape: &'static str,
}

impl ColorPresetId {
    pub const ALL: [ColorPresetId; 3] = [ColorPresetId::P1, ColorPresetId::P2, ColorPresetId::P3];

    /// Parses a persisted id. Unknown ids fall back to `p1`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw {
            "p2" => ColorPresetId::P2,
            "p3" => ColorPresetId::P3,
            _ => ColorPresetId::P1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorPresetId::P1 => "p1",
            ColorPresetId::P2 => "p2",
            ColorPresetId::P3 => "p3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorPresetId::P1 => "Blue / Dark contour",
            ColorPresetId::P2 => "Blue / NATO",
            ColorPresetId::P3 => "Light / Neutral",
        }
    }

    pub fn colors(self) -> OrbatColors {
        match self {
            ColorPresetId::P1 => OrbatColors {
                bg: "#b3d9ff",
                stroke: "#111827",
                shape: "#111827",
            },
            ColorPresetId::P2 => OrbatColors {
                bg: "#b3d9ff",
                stroke: "#0033a0",
                shape: "#0033a0",
            },
            ColorPresetId::P3 => OrbatColors {
                bg: "#f3f4f6",
                stroke: "#1f2937",
                shape: "#0f172a",
            },
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ColorPresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OrbatColors {
    pub fn bg_color(&self) -> Color {
        hex_to_color(self.bg)
    }

    pub fn stroke_color(&self) -> Color {
        hex_to_color(self.stroke)
    }
}

/// `#rrggbb` to a terminal RGB color; anything else maps to `Color::Reset`.
pub fn hex_to_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::Reset;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}
