//! Scrollbar: a track with a thumb sized to the visible share of the content.

use serde::{Deserialize, Serialize};

use super::{StatefulWidget, Widget};
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::state::ScrollbarState;
use crate::style::Style;
use crate::symbols::scrollbar as glyphs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollbarOrientation {
    #[default]
    VerticalRight,
    VerticalLeft,
    HorizontalBottom,
    HorizontalTop,
}

impl ScrollbarOrientation {
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            ScrollbarOrientation::VerticalRight | ScrollbarOrientation::VerticalLeft
        )
    }
}

/// Symbols left as `None` follow the orientation's defaults; an empty string
/// leaves that part undrawn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scrollbar {
    pub orientation: ScrollbarOrientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_symbol: Option<String>,
    pub thumb_style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_symbol: Option<String>,
    pub track_style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_symbol: Option<String>,
    pub begin_style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_symbol: Option<String>,
    pub end_style: Style,
    pub style: Style,
    /// Used when rendered without external state.
    pub content_length: usize,
    pub position: usize,
    pub viewport_content_length: usize,
}

fn resolve<'a>(symbol: &'a Option<String>, default: &'static str) -> Option<&'a str> {
    match symbol.as_deref() {
        Some("") => None,
        Some(s) => Some(s),
        None => Some(default),
    }
}

impl Scrollbar {
    pub fn new(orientation: ScrollbarOrientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn thumb_symbol(mut self, symbol: &str) -> Self {
        self.thumb_symbol = Some(symbol.to_string());
        self
    }

    pub fn thumb_style(mut self, style: Style) -> Self {
        self.thumb_style = style;
        self
    }

    pub fn track_symbol(mut self, symbol: Option<&str>) -> Self {
        self.track_symbol = Some(symbol.unwrap_or_default().to_string());
        self
    }

    pub fn track_style(mut self, style: Style) -> Self {
        self.track_style = style;
        self
    }

    pub fn begin_symbol(mut self, symbol: Option<&str>) -> Self {
        self.begin_symbol = Some(symbol.unwrap_or_default().to_string());
        self
    }

    pub fn end_symbol(mut self, symbol: Option<&str>) -> Self {
        self.end_symbol = Some(symbol.unwrap_or_default().to_string());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn symbols(&self) -> [Option<&str>; 4] {
        let vertical = self.orientation.is_vertical();
        let (track, begin, end) = if vertical {
            (glyphs::VERTICAL_TRACK, glyphs::VERTICAL_BEGIN, glyphs::VERTICAL_END)
        } else {
            (glyphs::HORIZONTAL_TRACK, glyphs::HORIZONTAL_BEGIN, glyphs::HORIZONTAL_END)
        };
        [
            resolve(&self.begin_symbol, begin),
            resolve(&self.track_symbol, track),
            resolve(&self.thumb_symbol, glyphs::THUMB),
            resolve(&self.end_symbol, end),
        ]
    }

    /// The single row or column the bar occupies.
    fn bar_area(&self, area: Rect) -> Rect {
        match self.orientation {
            ScrollbarOrientation::VerticalRight => {
                Rect::new(area.right() - 1, area.y, 1, area.height)
            }
            ScrollbarOrientation::VerticalLeft => Rect::new(area.x, area.y, 1, area.height),
            ScrollbarOrientation::HorizontalBottom => {
                Rect::new(area.x, area.bottom() - 1, area.width, 1)
            }
            ScrollbarOrientation::HorizontalTop => Rect::new(area.x, area.y, area.width, 1),
        }
    }

    /// `(track before thumb, thumb, track after thumb)` in cells.
    fn part_lengths(
        &self,
        track_length: u16,
        viewport: usize,
        state: &ScrollbarState,
    ) -> (usize, usize, usize) {
        let track = f64::from(track_length);
        let max_position = state.content_length.saturating_sub(1) as f64;
        let start = (state.position as f64).clamp(0.0, max_position);
        let viewport = viewport as f64;
        let max_viewport_position = max_position + viewport;
        let thumb_start = (start * track / max_viewport_position)
            .round()
            .clamp(0.0, track - 1.0) as usize;
        let thumb_end = ((start + viewport) * track / max_viewport_position)
            .round()
            .clamp(0.0, track) as usize;
        let thumb = thumb_end.saturating_sub(thumb_start).max(1);
        let after = (track_length as usize).saturating_sub(thumb_start + thumb);
        (thumb_start, thumb, after)
    }
}

impl Widget for Scrollbar {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut state = ScrollbarState {
            content_length: self.content_length,
            position: self.position,
            viewport_content_length: self.viewport_content_length,
        };
        StatefulWidget::render(self, area, buf, &mut state);
    }
}

impl StatefulWidget for Scrollbar {
    type State = ScrollbarState;

    fn render(&self, area: Rect, buf: &mut Buffer, state: &mut ScrollbarState) {
        let area = area.intersection(buf.area());
        if area.is_empty() || state.content_length == 0 {
            return;
        }
        let bar = self.bar_area(area);
        let length = if self.orientation.is_vertical() {
            bar.height
        } else {
            bar.width
        };
        let [begin, track, thumb, end] = self.symbols();
        let heads = u16::from(begin.is_some()) + u16::from(end.is_some());
        let track_length = length.saturating_sub(heads);
        if track_length == 0 {
            return;
        }
        let viewport = if state.viewport_content_length == 0 {
            length as usize
        } else {
            state.viewport_content_length
        };
        let (before, thumb_len, after) = self.part_lengths(track_length, viewport, state);

        buf.set_style(bar, self.style);
        let parts = begin
            .map(|s| (Some(s), self.begin_style))
            .into_iter()
            .chain(std::iter::repeat((track, self.track_style)).take(before))
            .chain(std::iter::repeat((thumb, self.thumb_style)).take(thumb_len))
            .chain(std::iter::repeat((track, self.track_style)).take(after))
            .chain(end.map(|s| (Some(s), self.end_style)));
        for (i, (symbol, style)) in parts.enumerate() {
            let (x, y) = if self.orientation.is_vertical() {
                (bar.x, bar.y + i as u16)
            } else {
                (bar.x + i as u16, bar.y)
            };
            if let Some(symbol) = symbol {
                buf.set_string(x, y, symbol, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    fn column(buf: &Buffer, x: u16) -> String {
        (0..buf.area().height)
            .map(|y| buf.cell(x, y).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_vertical_thumb_at_top() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 6));
        let mut state = ScrollbarState::new(10);
        StatefulWidget::render(&Scrollbar::default(), buf.area(), &mut buf, &mut state);
        assert_eq!(column(&buf, 2), "↑██║║↓");
        assert_eq!(column(&buf, 0), "      ");
    }

    #[test]
    fn test_vertical_thumb_at_end() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 6));
        let mut state = ScrollbarState::new(10);
        state.last();
        StatefulWidget::render(&Scrollbar::default(), buf.area(), &mut buf, &mut state);
        assert_eq!(column(&buf, 0), "↑║║██↓");
    }

    #[test]
    fn test_stateless_horizontal_without_heads() {
        let bar = Scrollbar {
            orientation: ScrollbarOrientation::HorizontalBottom,
            content_length: 4,
            position: 1,
            viewport_content_length: 2,
            thumb_style: Style::new().fg(Color::Red),
            ..Scrollbar::default()
        }
        .begin_symbol(None)
        .end_symbol(None)
        .track_symbol(Some("-"));
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 2));
        Widget::render(&bar, buf.area(), &mut buf);
        assert_eq!(buf.content_lines(), vec!["     ", "-██--"]);
        assert_eq!(buf.cell(1, 1).unwrap().fg, Color::Red);
    }

    #[test]
    fn test_empty_content_draws_nothing() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 4));
        Widget::render(&Scrollbar::default(), buf.area(), &mut buf);
        assert_eq!(column(&buf, 0), "    ");
    }

    #[test]
    fn test_json_defaults_follow_orientation() {
        let bar: Scrollbar = serde_json::from_str(
            r##"{"orientation": "horizontal_top", "content_length": 3, "thumb_symbol": "#"}"##,
        )
        .unwrap();
        assert_eq!(
            bar.symbols(),
            [Some("←"), Some("═"), Some("#"), Some("→")]
        );
    }
}
