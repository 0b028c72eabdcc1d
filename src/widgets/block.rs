//! Block: borders, titles, padding, and a background style around an area.

use bitflags::bitflags;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::Widget;
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::style::{Color, Style};
use crate::symbols::BorderType;
use crate::text::{Alignment, Line};

bitflags! {
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Borders: u8 {
        const NONE   = 0b0000;
        const TOP    = 0b0001;
        const RIGHT  = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT   = 0b1000;
        const ALL = Self::TOP.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits() | Self::LEFT.bits();
    }
}

const BORDER_NAMES: [(&str, Borders); 4] = [
    ("top", Borders::TOP),
    ("right", Borders::RIGHT),
    ("bottom", Borders::BOTTOM),
    ("left", Borders::LEFT),
];

impl Borders {
    pub fn parse_name(name: &str) -> Option<Borders> {
        match name {
            "all" => Some(Borders::ALL),
            "none" => Some(Borders::NONE),
            _ => BORDER_NAMES
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, b)| *b),
        }
    }
}

impl Serialize for Borders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            BORDER_NAMES
                .iter()
                .filter(|(_, b)| self.contains(*b))
                .map(|(n, _)| *n),
        )
    }
}

impl<'de> Deserialize<'de> for Borders {
    /// Accepts `"all"`, `"none"`, a single side, or a list of sides.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }
        let names = match Repr::deserialize(deserializer)? {
            Repr::One(name) => vec![name],
            Repr::Many(names) => names,
        };
        names.iter().try_fold(Borders::NONE, |acc, name| {
            Borders::parse_name(name)
                .map(|b| acc | b)
                .ok_or_else(|| de::Error::custom(format!("unknown border: {name}")))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

impl Padding {
    pub const fn new(left: u16, right: u16, top: u16, bottom: u16) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub const fn uniform(n: u16) -> Self {
        Self::new(n, n, n, n)
    }

    pub const fn horizontal(n: u16) -> Self {
        Self::new(n, n, 0, 0)
    }

    pub const fn vertical(n: u16) -> Self {
        Self::new(0, 0, n, n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitlePosition {
    #[default]
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "TitleRepr")]
pub struct Title {
    pub content: Line,
    pub alignment: Option<Alignment>,
    pub position: TitlePosition,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TitleRepr {
    Raw(String),
    Full {
        content: Line,
        #[serde(default)]
        alignment: Option<Alignment>,
        #[serde(default)]
        position: TitlePosition,
    },
}

impl From<TitleRepr> for Title {
    fn from(repr: TitleRepr) -> Self {
        match repr {
            TitleRepr::Raw(s) => Title::from(s.as_str()),
            TitleRepr::Full {
                content,
                alignment,
                position,
            } => Title {
                content,
                alignment,
                position,
            },
        }
    }
}

impl From<&str> for Title {
    fn from(s: &str) -> Self {
        Title {
            content: Line::raw(s),
            ..Title::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    /// Shorthand for a single top title using `title_alignment`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Line>,
    pub titles: Vec<Title>,
    pub title_alignment: Alignment,
    pub title_style: Style,
    pub borders: Borders,
    pub border_type: BorderType,
    pub border_style: Style,
    /// Foreground of the border, applied over `border_style`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    pub style: Style,
    pub padding: Padding,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bordered() -> Self {
        Self::default().borders(Borders::ALL)
    }

    pub fn title(mut self, title: impl Into<Title>) -> Self {
        self.titles.push(title.into());
        self
    }

    pub fn title_alignment(mut self, alignment: Alignment) -> Self {
        self.title_alignment = alignment;
        self
    }

    pub fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    pub fn border_type(mut self, border_type: BorderType) -> Self {
        self.border_type = border_type;
        self
    }

    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    fn all_titles(&self) -> impl Iterator<Item = Title> + '_ {
        let shorthand = self.title.as_ref().map(|line| Title {
            content: line.clone(),
            ..Title::default()
        });
        shorthand.into_iter().chain(self.titles.iter().cloned())
    }

    fn has_title_at(&self, position: TitlePosition) -> bool {
        self.all_titles().any(|t| t.position == position)
    }

    /// The area left for content once borders, title rows and padding are
    /// taken out.
    pub fn inner(&self, area: Rect) -> Rect {
        let mut inner = area;
        if self.borders.contains(Borders::LEFT) {
            inner.x = inner.x.saturating_add(1).min(inner.right());
            inner.width = inner.width.saturating_sub(1);
        }
        if self.borders.contains(Borders::TOP) || self.has_title_at(TitlePosition::Top) {
            inner.y = inner.y.saturating_add(1).min(inner.bottom());
            inner.height = inner.height.saturating_sub(1);
        }
        if self.borders.contains(Borders::RIGHT) {
            inner.width = inner.width.saturating_sub(1);
        }
        if self.borders.contains(Borders::BOTTOM) || self.has_title_at(TitlePosition::Bottom) {
            inner.height = inner.height.saturating_sub(1);
        }

        let padding = self.padding;
        inner.x = inner.x.saturating_add(padding.left).min(inner.right());
        inner.y = inner.y.saturating_add(padding.top).min(inner.bottom());
        inner.width = inner
            .width
            .saturating_sub(padding.left.saturating_add(padding.right));
        inner.height = inner
            .height
            .saturating_sub(padding.top.saturating_add(padding.bottom));
        inner
    }

    fn render_borders(&self, area: Rect, buf: &mut Buffer) {
        let set = self.border_type.set();
        let mut style = self.border_style;
        if let Some(color) = self.border_color {
            style = style.fg(color);
        }
        let b = self.borders;
        let (left, top) = (area.left(), area.top());
        let (right, bottom) = (area.right() - 1, area.bottom() - 1);

        if b.contains(Borders::TOP) {
            for x in left..=right {
                buf.set_string(x, top, set.horizontal, style);
            }
        }
        if b.contains(Borders::BOTTOM) {
            for x in left..=right {
                buf.set_string(x, bottom, set.horizontal, style);
            }
        }
        if b.contains(Borders::LEFT) {
            for y in top..=bottom {
                buf.set_string(left, y, set.vertical, style);
            }
        }
        if b.contains(Borders::RIGHT) {
            for y in top..=bottom {
                buf.set_string(right, y, set.vertical, style);
            }
        }

        let corners = [
            (Borders::TOP | Borders::LEFT, left, top, set.top_left),
            (Borders::TOP | Borders::RIGHT, right, top, set.top_right),
            (Borders::BOTTOM | Borders::LEFT, left, bottom, set.bottom_left),
            (Borders::BOTTOM | Borders::RIGHT, right, bottom, set.bottom_right),
        ];
        for (needed, x, y, symbol) in corners {
            if b.contains(needed) {
                buf.set_string(x, y, symbol, style);
            }
        }
    }

    fn render_titles(&self, area: Rect, buf: &mut Buffer, position: TitlePosition) {
        let y = match position {
            TitlePosition::Top => area.top(),
            TitlePosition::Bottom => area.bottom() - 1,
        };
        let lpad = u16::from(self.borders.contains(Borders::LEFT));
        let rpad = u16::from(self.borders.contains(Borders::RIGHT));
        let row = Rect::new(
            area.x + lpad,
            y,
            area.width.saturating_sub(lpad + rpad),
            1,
        );
        if row.is_empty() {
            return;
        }

        for alignment in [Alignment::Left, Alignment::Center, Alignment::Right] {
            let group: Vec<Title> = self
                .all_titles()
                .filter(|t| t.position == position)
                .filter(|t| t.alignment.unwrap_or(self.title_alignment) == alignment)
                .collect();
            if group.is_empty() {
                continue;
            }
            let total: usize = group.iter().map(|t| t.content.width()).sum::<usize>()
                + group.len().saturating_sub(1);
            let offset = alignment.offset(total.min(u16::MAX as usize) as u16, row.width);
            let mut x = row.x + offset;
            for (i, title) in group.iter().enumerate() {
                if i > 0 {
                    x += 1;
                }
                if x >= row.right() {
                    break;
                }
                let mut line = title.content.clone();
                line.style = self.title_style.patch(line.style);
                let (next, _) = buf.set_line(x, y, &line, row.right() - x);
                x = next;
            }
        }
    }
}

impl Widget for Block {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area());
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.style);
        self.render_borders(area, buf);
        self.render_titles(area, buf, TitlePosition::Top);
        if area.height > 1 {
            self.render_titles(area, buf, TitlePosition::Bottom);
        }
    }
}

/// Render `block` when present and return the area left for content.
pub(crate) fn render_optional(block: Option<&Block>, area: Rect, buf: &mut Buffer) -> Rect {
    match block {
        Some(block) => {
            block.render(area, buf);
            block.inner(area)
        }
        None => area,
    }
}
