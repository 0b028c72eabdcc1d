//! Glyph tables used by widgets: borders, bars, braille, markers.

use serde::{Deserialize, Serialize};

// ============================================================================
// Borders
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSet {
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
    pub horizontal: &'static str,
    pub vertical: &'static str,
}

pub const PLAIN: BorderSet = BorderSet {
    top_left: "┌",
    top_right: "┐",
    bottom_left: "└",
    bottom_right: "┘",
    horizontal: "─",
    vertical: "│",
};

pub const ROUNDED: BorderSet = BorderSet {
    top_left: "╭",
    top_right: "╮",
    bottom_left: "╰",
    bottom_right: "╯",
    ..PLAIN
};

pub const DOUBLE: BorderSet = BorderSet {
    top_left: "╔",
    top_right: "╗",
    bottom_left: "╚",
    bottom_right: "╝",
    horizontal: "═",
    vertical: "║",
};

pub const THICK: BorderSet = BorderSet {
    top_left: "┏",
    top_right: "┓",
    bottom_left: "┗",
    bottom_right: "┛",
    horizontal: "━",
    vertical: "┃",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderType {
    #[default]
    Plain,
    Rounded,
    Double,
    Thick,
}

impl BorderType {
    pub fn set(self) -> BorderSet {
        match self {
            BorderType::Plain => PLAIN,
            BorderType::Rounded => ROUNDED,
            BorderType::Double => DOUBLE,
            BorderType::Thick => THICK,
        }
    }
}

// ============================================================================
// Bars and blocks
// ============================================================================

pub const FULL_BLOCK: &str = "█";
pub const LIGHT_SHADE: &str = "░";

/// Vertical fill levels in eighths, index 0 (empty) through 8 (full).
pub const VERTICAL_EIGHTHS: [&str; 9] = [" ", "▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Horizontal fill levels in eighths, index 0 (empty) through 8 (full).
pub const HORIZONTAL_EIGHTHS: [&str; 9] = [" ", "▏", "▎", "▍", "▌", "▋", "▊", "▉", "█"];

pub const LINE_HORIZONTAL: &str = "─";
pub const LINE_VERTICAL: &str = "│";
pub const LINE_BOTTOM_LEFT: &str = "└";

// ============================================================================
// Scrollbar
// ============================================================================

pub mod scrollbar {
    pub const VERTICAL_TRACK: &str = "║";
    pub const VERTICAL_BEGIN: &str = "↑";
    pub const VERTICAL_END: &str = "↓";
    pub const HORIZONTAL_TRACK: &str = "═";
    pub const HORIZONTAL_BEGIN: &str = "←";
    pub const HORIZONTAL_END: &str = "→";
    pub const THUMB: &str = "█";
}

// ============================================================================
// Markers (chart / canvas)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Dot,
    Block,
    Bar,
    #[default]
    Braille,
    HalfBlock,
}

impl Marker {
    /// Sub-cell dot resolution (columns, rows) per terminal cell.
    pub fn resolution(self) -> (u16, u16) {
        match self {
            Marker::Braille => (2, 4),
            Marker::HalfBlock => (1, 2),
            Marker::Dot | Marker::Block | Marker::Bar => (1, 1),
        }
    }

    /// Glyph for a 1x1 marker cell.
    pub fn symbol(self) -> &'static str {
        match self {
            Marker::Dot => "•",
            Marker::Block => FULL_BLOCK,
            Marker::Bar => "▄",
            Marker::Braille => "⣿",
            Marker::HalfBlock => "▀",
        }
    }
}

pub const BRAILLE_BLANK: u32 = 0x2800;

/// Dot bits by (row, column) inside a braille cell.
pub const BRAILLE_DOTS: [[u8; 2]; 4] = [
    [0x01, 0x08],
    [0x02, 0x10],
    [0x04, 0x20],
    [0x40, 0x80],
];

/// Glyph for the half-block marker given (upper, lower) occupancy.
pub fn half_block(upper: bool, lower: bool) -> &'static str {
    match (upper, lower) {
        (true, true) => FULL_BLOCK,
        (true, false) => "▀",
        (false, true) => "▄",
        (false, false) => " ",
    }
}
