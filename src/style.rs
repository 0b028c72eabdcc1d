//! Style Module — colors, modifiers, and style composition.
//!
//! Responsibilities:
//! - `Color` model (named, indexed, RGB) with string parsing
//! - `Modifier` bit set for text attributes
//! - `Style` overlay semantics: present fields win, absent fields inherit
//! - Conversion to crossterm colors for the terminal writer

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

// ============================================================================
// Color
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Reset,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    DarkGray,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    White,
    Indexed(u8),
    Rgb(u8, u8, u8),
}

const NAMED_COLORS: [(&str, Color); 17] = [
    ("reset", Color::Reset),
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("gray", Color::Gray),
    ("dark_gray", Color::DarkGray),
    ("light_red", Color::LightRed),
    ("light_green", Color::LightGreen),
    ("light_yellow", Color::LightYellow),
    ("light_blue", Color::LightBlue),
    ("light_magenta", Color::LightMagenta),
    ("light_cyan", Color::LightCyan),
    ("white", Color::White),
];

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let normalized = normalized.replace("grey", "gray");

        if let Some(hex) = normalized.strip_prefix('#') {
            if hex.len() == 6 {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                    return Ok(Color::Rgb(r, g, b));
                }
            }
            return Err(Error::InvalidColor(s.to_string()));
        }

        if let Ok(index) = normalized.parse::<u8>() {
            return Ok(Color::Indexed(index));
        }

        let alias = match normalized.as_str() {
            "default" => "reset",
            "darkgray" => "dark_gray",
            "silver" => "gray",
            other => other,
        };
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == alias)
            .map(|(_, c)| *c)
            .ok_or_else(|| Error::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Indexed(i) => write!(f, "{i}"),
            Color::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            named => {
                let name = NAMED_COLORS
                    .iter()
                    .find(|(_, c)| c == named)
                    .map(|(n, _)| *n)
                    .unwrap_or("reset");
                f.write_str(name)
            }
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColorVisitor;

        impl Visitor<'_> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a color name, \"#rrggbb\", or an index 0-255")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Color, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Color, E> {
                u8::try_from(v)
                    .map(Color::Indexed)
                    .map_err(|_| E::custom(format!("color index {v} out of range")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Color, E> {
                u8::try_from(v)
                    .map(Color::Indexed)
                    .map_err(|_| E::custom(format!("color index {v} out of range")))
            }
        }

        deserializer.deserialize_any(ColorVisitor)
    }
}

impl Color {
    pub fn to_crossterm(self) -> crossterm::style::Color {
        use crossterm::style::Color as C;
        match self {
            Color::Reset => C::Reset,
            Color::Black => C::Black,
            Color::Red => C::DarkRed,
            Color::Green => C::DarkGreen,
            Color::Yellow => C::DarkYellow,
            Color::Blue => C::DarkBlue,
            Color::Magenta => C::DarkMagenta,
            Color::Cyan => C::DarkCyan,
            Color::Gray => C::Grey,
            Color::DarkGray => C::DarkGrey,
            Color::LightRed => C::Red,
            Color::LightGreen => C::Green,
            Color::LightYellow => C::Yellow,
            Color::LightBlue => C::Blue,
            Color::LightMagenta => C::Magenta,
            Color::LightCyan => C::Cyan,
            Color::White => C::White,
            Color::Indexed(i) => C::AnsiValue(i),
            Color::Rgb(r, g, b) => C::Rgb { r, g, b },
        }
    }
}

// ============================================================================
// Modifier (bitflags)
// ============================================================================

bitflags! {
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifier: u16 {
        const BOLD        = 0b0000_0000_0001;
        const DIM         = 0b0000_0000_0010;
        const ITALIC      = 0b0000_0000_0100;
        const UNDERLINED  = 0b0000_0000_1000;
        const SLOW_BLINK  = 0b0000_0001_0000;
        const RAPID_BLINK = 0b0000_0010_0000;
        const REVERSED    = 0b0000_0100_0000;
        const HIDDEN      = 0b0000_1000_0000;
        const CROSSED_OUT = 0b0001_0000_0000;
    }
}

const MODIFIER_NAMES: [(&str, Modifier); 9] = [
    ("bold", Modifier::BOLD),
    ("dim", Modifier::DIM),
    ("italic", Modifier::ITALIC),
    ("underlined", Modifier::UNDERLINED),
    ("slow_blink", Modifier::SLOW_BLINK),
    ("rapid_blink", Modifier::RAPID_BLINK),
    ("reversed", Modifier::REVERSED),
    ("hidden", Modifier::HIDDEN),
    ("crossed_out", Modifier::CROSSED_OUT),
];

impl Modifier {
    pub fn parse_name(name: &str) -> Option<Modifier> {
        let name = match name {
            "underline" => "underlined",
            "strikethrough" => "crossed_out",
            "reverse" => "reversed",
            other => other,
        };
        MODIFIER_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, m)| *m)
    }

    pub fn names(self) -> Vec<&'static str> {
        MODIFIER_NAMES
            .iter()
            .filter(|(_, m)| self.contains(*m))
            .map(|(n, _)| *n)
            .collect()
    }
}

impl Serialize for Modifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

impl<'de> Deserialize<'de> for Modifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names.iter().try_fold(Modifier::empty(), |acc, name| {
            Modifier::parse_name(name)
                .map(|m| acc | m)
                .ok_or_else(|| de::Error::custom(format!("unknown modifier: {name}")))
        })
    }
}

// ============================================================================
// Style
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(alias = "modifiers")]
    pub add_modifier: Modifier,
    #[serde(alias = "remove_modifiers")]
    pub sub_modifier: Modifier,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            add_modifier: Modifier::empty(),
            sub_modifier: Modifier::empty(),
        }
    }

    /// A style that resets every attribute when patched over another.
    pub const fn reset() -> Self {
        Self {
            fg: Some(Color::Reset),
            bg: Some(Color::Reset),
            add_modifier: Modifier::empty(),
            sub_modifier: Modifier::all(),
        }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn add_modifier(mut self, modifier: Modifier) -> Self {
        self.sub_modifier.remove(modifier);
        self.add_modifier.insert(modifier);
        self
    }

    pub fn remove_modifier(mut self, modifier: Modifier) -> Self {
        self.add_modifier.remove(modifier);
        self.sub_modifier.insert(modifier);
        self
    }

    /// Overlay `other` on top of `self`.
    pub fn patch(self, other: Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            add_modifier: (self.add_modifier - other.sub_modifier) | other.add_modifier,
            sub_modifier: (self.sub_modifier - other.add_modifier) | other.sub_modifier,
        }
    }
}

/// Later-wins merge: fields present in `overlay` replace those of `base`.
pub fn merge(base: Style, overlay: Style) -> Style {
    base.patch(overlay)
}

impl From<Color> for Style {
    fn from(color: Color) -> Self {
        Style::new().fg(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::Red);
        assert_eq!("light_blue".parse::<Color>().unwrap(), Color::LightBlue);
        assert_eq!("dark_grey".parse::<Color>().unwrap(), Color::DarkGray);
        assert_eq!("Reset".parse::<Color>().unwrap(), Color::Reset);
    }

    #[test]
    fn test_parse_hex_and_indexed() {
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::Rgb(255, 128, 0));
        assert_eq!("42".parse::<Color>().unwrap(), Color::Indexed(42));
        assert!("#ff80".parse::<Color>().is_err());
        assert!("chartreuse".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_json() {
        let c: Color = serde_json::from_str("\"#102030\"").unwrap();
        assert_eq!(c, Color::Rgb(16, 32, 48));
        let c: Color = serde_json::from_str("200").unwrap();
        assert_eq!(c, Color::Indexed(200));
        assert_eq!(serde_json::to_string(&Color::LightRed).unwrap(), "\"light_red\"");
        assert!(serde_json::from_str::<Color>("300").is_err());
    }

    #[test]
    fn test_merge_overlay_wins() {
        let base = Style::new().fg(Color::Red).bg(Color::Blue);
        let overlay = Style::new().fg(Color::Green);
        let merged = merge(base, overlay);
        assert_eq!(merged.fg, Some(Color::Green));
        assert_eq!(merged.bg, Some(Color::Blue));
    }

    #[test]
    fn test_merge_modifiers() {
        let base = Style::new().add_modifier(Modifier::BOLD | Modifier::ITALIC);
        let overlay = Style::new()
            .add_modifier(Modifier::UNDERLINED)
            .remove_modifier(Modifier::ITALIC);
        let merged = base.patch(overlay);
        assert_eq!(merged.add_modifier, Modifier::BOLD | Modifier::UNDERLINED);
        assert!(merged.sub_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_reversed_stays_a_flag() {
        let s = Style::new()
            .fg(Color::White)
            .bg(Color::Black)
            .add_modifier(Modifier::REVERSED);
        let merged = merge(Style::new(), s);
        assert_eq!(merged.fg, Some(Color::White));
        assert_eq!(merged.bg, Some(Color::Black));
        assert!(merged.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_style_json_accepts_modifier_alias() {
        let s: Style =
            serde_json::from_str(r#"{"fg":"yellow","modifiers":["bold","underline"]}"#).unwrap();
        assert_eq!(s.fg, Some(Color::Yellow));
        assert_eq!(s.bg, None);
        assert_eq!(s.add_modifier, Modifier::BOLD | Modifier::UNDERLINED);
    }

    #[test]
    fn test_modifier_names_in_declaration_order() {
        let m = Modifier::CROSSED_OUT | Modifier::BOLD;
        assert_eq!(m.names(), vec!["bold", "crossed_out"]);
    }

    #[test]
    fn test_modifier_names_alongside_flag_names() {
        assert_eq!(Modifier::parse_name("underline"), Some(Modifier::UNDERLINED));
        assert_eq!(Modifier::parse_name("crossed_out"), Some(Modifier::CROSSED_OUT));
        assert_eq!(Modifier::parse_name("sparkle"), None);
        assert_eq!(Modifier::from_name("BOLD"), Some(Modifier::BOLD));
    }
}
