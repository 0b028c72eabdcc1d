//! Tabs: a single row of titles with one highlighted.

use serde::{Deserialize, Serialize};

use super::block::{self, Block};
use super::Widget;
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::style::Style;
use crate::symbols::LINE_VERTICAL;
use crate::text::Line;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tabs {
    pub titles: Vec<Line>,
    #[serde(alias = "selected_index")]
    pub selected: Option<usize>,
    pub divider: String,
    pub style: Style,
    pub highlight_style: Style,
    pub padding_left: String,
    pub padding_right: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

impl Default for Tabs {
    fn default() -> Self {
        Self {
            titles: Vec::new(),
            selected: None,
            divider: LINE_VERTICAL.to_string(),
            style: Style::default(),
            highlight_style: Style::new().add_modifier(crate::style::Modifier::REVERSED),
            padding_left: " ".to_string(),
            padding_right: " ".to_string(),
            block: None,
        }
    }
}

impl Tabs {
    pub fn new<T: Into<Line>>(titles: impl IntoIterator<Item = T>) -> Self {
        let titles: Vec<Line> = titles.into_iter().map(Into::into).collect();
        let selected = if titles.is_empty() { None } else { Some(0) };
        Self {
            titles,
            selected,
            ..Self::default()
        }
    }

    pub fn select(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    pub fn divider(mut self, divider: &str) -> Self {
        self.divider = divider.to_string();
        self
    }

    pub fn padding(mut self, left: &str, right: &str) -> Self {
        self.padding_left = left.to_string();
        self.padding_right = right.to_string();
        self
    }

    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for Tabs {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area());
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.style);
        let inner = block::render_optional(self.block.as_ref(), area, buf);
        if inner.is_empty() {
            return;
        }

        let y = inner.y;
        let right = inner.right();
        let mut x = inner.x;
        let last = self.titles.len().saturating_sub(1);
        for (i, title) in self.titles.iter().enumerate() {
            if x >= right {
                break;
            }
            (x, _) = buf.set_stringn(x, y, &self.padding_left, (right - x) as usize, self.style);
            if x >= right {
                break;
            }
            let start = x;
            (x, _) = buf.set_line(x, y, title, right - x);
            if self.selected == Some(i) {
                buf.set_style(Rect::new(start, y, x - start, 1), self.highlight_style);
            }
            if x >= right {
                break;
            }
            (x, _) = buf.set_stringn(x, y, &self.padding_right, (right - x) as usize, self.style);
            if i < last && x < right {
                (x, _) = buf.set_stringn(x, y, &self.divider, (right - x) as usize, self.style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, Modifier};

    fn render(tabs: &Tabs, width: u16) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, width, 1));
        tabs.render(buf.area(), &mut buf);
        buf
    }

    #[test]
    fn test_titles_with_divider_and_padding() {
        let buf = render(&Tabs::new(["A", "B", "C"]), 12);
        assert_eq!(buf.content_lines(), vec![" A │ B │ C  "]);
    }

    #[test]
    fn test_selected_title_highlighted() {
        let tabs = Tabs::new(["A", "B"])
            .select(1)
            .highlight_style(Style::new().fg(Color::Yellow));
        let buf = render(&tabs, 8);
        assert_eq!(buf.cell(5, 0).unwrap().fg, Color::Yellow);
        assert_eq!(buf.cell(1, 0).unwrap().fg, Color::Reset);
        assert_eq!(buf.cell(4, 0).unwrap().fg, Color::Reset);
    }

    #[test]
    fn test_default_highlight_is_reversed() {
        let buf = render(&Tabs::new(["A"]), 4);
        assert!(buf.cell(1, 0).unwrap().modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_custom_divider_and_clipping() {
        let tabs = Tabs::new(["one", "two"]).divider("|").padding("", "");
        assert_eq!(render(&tabs, 5).content_lines(), vec!["one|t"]);
    }

    #[test]
    fn test_json_selected_index_alias() {
        let tabs: Tabs =
            serde_json::from_str(r#"{"titles": ["a", "b"], "selected_index": 1}"#).unwrap();
        assert_eq!(tabs.selected, Some(1));
        assert_eq!(tabs.divider, "│");
    }
}
