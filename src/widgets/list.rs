//! List: a vertical sequence of items with an optional highlighted selection.

use serde::{Deserialize, Serialize};

use super::block::{self, Block};
use super::{StatefulWidget, Widget};
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::scroll;
use crate::state::ListState;
use crate::style::Style;
use crate::text::{self, Alignment, Text};

/// When to reserve the column used by the highlight symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightSpacing {
    Always,
    #[default]
    WhenSelected,
    Never,
}

impl HighlightSpacing {
    pub(crate) fn should_add(self, has_selection: bool) -> bool {
        match self {
            HighlightSpacing::Always => true,
            HighlightSpacing::WhenSelected => has_selection,
            HighlightSpacing::Never => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListDirection {
    #[default]
    TopToBottom,
    BottomToTop,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ListItemRepr")]
pub struct ListItem {
    pub content: Text,
    pub style: Style,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListItemRepr {
    Raw(String),
    Styled {
        content: Text,
        #[serde(default)]
        style: Style,
    },
}

impl From<ListItemRepr> for ListItem {
    fn from(repr: ListItemRepr) -> Self {
        match repr {
            ListItemRepr::Raw(s) => ListItem::new(s),
            ListItemRepr::Styled { content, style } => ListItem { content, style },
        }
    }
}

impl ListItem {
    pub fn new(content: impl Into<Text>) -> Self {
        Self {
            content: content.into(),
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn height(&self) -> u16 {
        self.content.height().min(u16::MAX as usize) as u16
    }
}

fn default_highlight_symbol() -> String {
    "> ".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct List {
    pub items: Vec<ListItem>,
    pub style: Style,
    pub highlight_style: Style,
    pub highlight_symbol: String,
    pub repeat_highlight_symbol: bool,
    pub highlight_spacing: HighlightSpacing,
    pub direction: ListDirection,
    pub scroll_padding: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
    /// Selection used when rendered without external state.
    pub selected_index: Option<usize>,
}

impl Default for List {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            style: Style::default(),
            highlight_style: Style::default(),
            highlight_symbol: default_highlight_symbol(),
            repeat_highlight_symbol: false,
            highlight_spacing: HighlightSpacing::default(),
            direction: ListDirection::default(),
            scroll_padding: 0,
            block: None,
            selected_index: None,
        }
    }
}

impl List {
    pub fn new<T: Into<ListItem>>(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    pub fn highlight_symbol(mut self, symbol: &str) -> Self {
        self.highlight_symbol = symbol.to_string();
        self
    }

    pub fn repeat_highlight_symbol(mut self, repeat: bool) -> Self {
        self.repeat_highlight_symbol = repeat;
        self
    }

    pub fn highlight_spacing(mut self, spacing: HighlightSpacing) -> Self {
        self.highlight_spacing = spacing;
        self
    }

    pub fn direction(mut self, direction: ListDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn scroll_padding(mut self, padding: usize) -> Self {
        self.scroll_padding = padding;
        self
    }

    pub fn selected_index(mut self, index: Option<usize>) -> Self {
        self.selected_index = index;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Into<Text>> From<T> for ListItem {
    fn from(content: T) -> Self {
        ListItem::new(content)
    }
}

impl Widget for List {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut state = ListState::with_selected(self.selected_index);
        StatefulWidget::render(self, area, buf, &mut state);
    }
}

impl StatefulWidget for List {
    type State = ListState;

    fn render(&self, area: Rect, buf: &mut Buffer, state: &mut ListState) {
        let area = area.intersection(buf.area());
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.style);
        let inner = block::render_optional(self.block.as_ref(), area, buf);
        if inner.is_empty() {
            return;
        }
        if self.items.is_empty() {
            state.select(None);
            return;
        }
        if let Some(selected) = state.selected {
            if selected >= self.items.len() {
                state.select(Some(self.items.len() - 1));
            }
        }

        let heights: Vec<u16> = self.items.iter().map(ListItem::height).collect();
        let (first, last) = scroll::visible_bounds(
            &heights,
            state.selected,
            state.offset,
            inner.height,
            self.scroll_padding,
        );
        state.offset = first;

        let show_symbol = self.highlight_spacing.should_add(state.selected.is_some());
        let symbol_width = if show_symbol {
            (text::width(&self.highlight_symbol) as u16).min(inner.width)
        } else {
            0
        };
        let blank = " ".repeat(symbol_width as usize);

        let mut used = 0u16;
        for (index, item) in self.items.iter().enumerate().take(last).skip(first) {
            let height = item.height().min(inner.height - used);
            let y = match self.direction {
                ListDirection::TopToBottom => inner.y + used,
                ListDirection::BottomToTop => inner.bottom() - used - height,
            };
            used += height;
            let row = Rect::new(inner.x, y, inner.width, height);
            buf.set_style(row, item.style.patch(item.content.style));

            let is_selected = state.selected == Some(index);
            let content_x = inner.x + symbol_width;
            let content_width = inner.width - symbol_width;
            for (dy, line) in item.content.lines.iter().take(height as usize).enumerate() {
                let line_y = y + dy as u16;
                if show_symbol {
                    let symbol = if is_selected && (dy == 0 || self.repeat_highlight_symbol) {
                        self.highlight_symbol.as_str()
                    } else {
                        blank.as_str()
                    };
                    buf.set_stringn(inner.x, line_y, symbol, symbol_width as usize, item.style);
                }
                let alignment = line
                    .alignment
                    .or(item.content.alignment)
                    .unwrap_or(Alignment::Left);
                let line_width = line.width().min(u16::MAX as usize) as u16;
                let offset = alignment.offset(line_width, content_width);
                buf.set_line(content_x + offset, line_y, line, content_width - offset);
            }
            if is_selected {
                buf.set_style(row, self.highlight_style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, Modifier};

    fn lines(buf: &Buffer) -> Vec<String> {
        buf.content_lines()
            .into_iter()
            .map(|l| l.trim_end().to_string())
            .collect()
    }

    #[test]
    fn test_stateless_selected_index() {
        let list = List::new(["A", "B", "C"]).selected_index(Some(1));
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 5));
        Widget::render(&list, buf.area(), &mut buf);
        assert_eq!(lines(&buf), vec!["  A", "> B", "  C", "", ""]);
    }

    #[test]
    fn test_state_overrides_selected_index() {
        let list = List::new(["A", "B", "C"]).selected_index(Some(1));
        let mut state = ListState::with_selected(Some(2));
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 3));
        StatefulWidget::render(&list, buf.area(), &mut buf, &mut state);
        assert_eq!(lines(&buf), vec!["  A", "  B", "> C"]);
    }

    #[test]
    fn test_no_selection_no_symbol_column() {
        let list = List::new(["A", "B"]);
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 2));
        Widget::render(&list, buf.area(), &mut buf);
        assert_eq!(lines(&buf), vec!["A", "B"]);

        let always = List::new(["A"]).highlight_spacing(HighlightSpacing::Always);
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 1));
        Widget::render(&always, buf.area(), &mut buf);
        assert_eq!(lines(&buf), vec!["  A"]);
    }

    #[test]
    fn test_auto_scroll_writes_offset_back() {
        let items: Vec<String> = (0..10).map(|i| format!("item{i}")).collect();
        let list = List::new(items);
        let mut state = ListState::with_selected(Some(7));
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 3));
        StatefulWidget::render(&list, buf.area(), &mut buf, &mut state);
        assert_eq!(state.offset, 5);
        assert_eq!(lines(&buf), vec!["  item5", "  item6", "> item7"]);
    }

    #[test]
    fn test_selection_clamped_to_items() {
        let list = List::new(["A", "B"]);
        let mut state = ListState::with_selected(Some(9));
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 2));
        StatefulWidget::render(&list, buf.area(), &mut buf, &mut state);
        assert_eq!(state.selected, Some(1));
    }

    #[test]
    fn test_highlight_style_covers_row() {
        let list = List::new(["A", "B"])
            .highlight_style(Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .selected_index(Some(0));
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
        Widget::render(&list, buf.area(), &mut buf);
        assert_eq!(buf.cell(3, 0).unwrap().fg, Color::Yellow);
        assert!(buf.cell(0, 0).unwrap().modifier.contains(Modifier::BOLD));
        assert_eq!(buf.cell(3, 1).unwrap().fg, Color::Reset);
    }

    #[test]
    fn test_bottom_to_top() {
        let list = List::new(["A", "B"]).direction(ListDirection::BottomToTop);
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 3));
        Widget::render(&list, buf.area(), &mut buf);
        assert_eq!(lines(&buf), vec!["", "B", "A"]);
    }

    #[test]
    fn test_empty_list_clears_selection() {
        let list = List::new(Vec::<String>::new());
        let mut state = ListState::with_selected(Some(0));
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 3));
        StatefulWidget::render(&list, buf.area(), &mut buf, &mut state);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_json_items() {
        let list: List = serde_json::from_str(
            r#"{"items": ["a", {"content": "b", "style": {"fg": "blue"}}], "highlight_symbol": ">>"}"#,
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.items[1].style.fg, Some(Color::Blue));
        assert_eq!(list.highlight_symbol, ">>");
    }
}
