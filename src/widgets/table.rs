//! Table: rows of cells laid out in constraint-sized columns.

use serde::{Deserialize, Serialize};

use super::block::{self, Block};
use super::list::HighlightSpacing;
use super::{StatefulWidget, Widget};
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::layout::{Constraint, Flex, Layout};
use crate::scroll;
use crate::state::TableState;
use crate::style::Style;
use crate::text::{self, Alignment, Text};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "TableCellRepr")]
pub struct TableCell {
    pub content: Text,
    pub style: Style,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TableCellRepr {
    Raw(String),
    Styled {
        content: Text,
        #[serde(default)]
        style: Style,
    },
}

impl From<TableCellRepr> for TableCell {
    fn from(repr: TableCellRepr) -> Self {
        match repr {
            TableCellRepr::Raw(s) => TableCell::from(s.as_str()),
            TableCellRepr::Styled { content, style } => TableCell { content, style },
        }
    }
}

impl From<&str> for TableCell {
    fn from(s: &str) -> Self {
        TableCell {
            content: Text::raw(s),
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RowRepr")]
pub struct Row {
    pub cells: Vec<TableCell>,
    pub height: u16,
    pub style: Style,
    pub top_margin: u16,
    pub bottom_margin: u16,
}

fn one() -> u16 {
    1
}

/// A row is either a bare list of cells or a full object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RowRepr {
    Cells(Vec<TableCell>),
    Full {
        cells: Vec<TableCell>,
        #[serde(default = "one")]
        height: u16,
        #[serde(default)]
        style: Style,
        #[serde(default)]
        top_margin: u16,
        #[serde(default)]
        bottom_margin: u16,
    },
}

impl From<RowRepr> for Row {
    fn from(repr: RowRepr) -> Self {
        match repr {
            RowRepr::Cells(cells) => Row::new(cells),
            RowRepr::Full {
                cells,
                height,
                style,
                top_margin,
                bottom_margin,
            } => Row {
                cells,
                height,
                style,
                top_margin,
                bottom_margin,
            },
        }
    }
}

impl Default for Row {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            height: 1,
            style: Style::default(),
            top_margin: 0,
            bottom_margin: 0,
        }
    }
}

impl Row {
    pub fn new<T: Into<TableCell>>(cells: impl IntoIterator<Item = T>) -> Self {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn bottom_margin(mut self, margin: u16) -> Self {
        self.bottom_margin = margin;
        self
    }

    fn total_height(&self) -> u16 {
        self.height
            .saturating_add(self.top_margin)
            .saturating_add(self.bottom_margin)
    }
}

fn default_column_spacing() -> u16 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Row>,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Row>,
    pub widths: Vec<Constraint>,
    #[serde(default = "default_column_spacing")]
    pub column_spacing: u16,
    pub flex: Flex,
    pub style: Style,
    pub highlight_style: Style,
    pub column_highlight_style: Style,
    pub cell_highlight_style: Style,
    pub highlight_symbol: String,
    pub highlight_spacing: HighlightSpacing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
    /// Used when rendered without external state.
    pub selected_row: Option<usize>,
    pub selected_column: Option<usize>,
    pub offset: usize,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            header: None,
            rows: Vec::new(),
            footer: None,
            widths: Vec::new(),
            column_spacing: default_column_spacing(),
            flex: Flex::default(),
            style: Style::default(),
            highlight_style: Style::default(),
            column_highlight_style: Style::default(),
            cell_highlight_style: Style::default(),
            highlight_symbol: String::new(),
            highlight_spacing: HighlightSpacing::default(),
            block: None,
            selected_row: None,
            selected_column: None,
            offset: 0,
        }
    }
}

impl Table {
    pub fn new(
        rows: impl IntoIterator<Item = Row>,
        widths: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            widths: widths.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn header(mut self, header: Row) -> Self {
        self.header = Some(header);
        self
    }

    pub fn footer(mut self, footer: Row) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    pub fn column_spacing(mut self, spacing: u16) -> Self {
        self.column_spacing = spacing;
        self
    }

    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    pub fn column_highlight_style(mut self, style: Style) -> Self {
        self.column_highlight_style = style;
        self
    }

    pub fn highlight_symbol(mut self, symbol: &str) -> Self {
        self.highlight_symbol = symbol.to_string();
        self
    }

    pub fn selected_row(mut self, row: Option<usize>) -> Self {
        self.selected_row = row;
        self
    }

    fn column_count(&self) -> usize {
        self.header
            .iter()
            .chain(&self.rows)
            .chain(&self.footer)
            .map(|r| r.cells.len())
            .max()
            .unwrap_or(0)
    }

    /// Column rects across `area`, after the selection column.
    fn columns(&self, area: Rect, selection_width: u16) -> Vec<Rect> {
        let widths = if self.widths.is_empty() {
            vec![Constraint::Fill(1); self.column_count()]
        } else {
            self.widths.clone()
        };
        let area = Rect::new(
            area.x + selection_width.min(area.width),
            area.y,
            area.width.saturating_sub(selection_width),
            area.height,
        );
        Layout::horizontal(widths)
            .flex(self.flex)
            .spacing(self.column_spacing)
            .split(area)
    }

    fn render_row(&self, row: &Row, area: Rect, columns: &[Rect], buf: &mut Buffer) {
        buf.set_style(area, row.style);
        for (cell, column) in row.cells.iter().zip(columns) {
            let cell_area = Rect::new(column.x, area.y, column.width, area.height);
            render_cell(cell, cell_area, buf);
        }
    }
}

fn render_cell(cell: &TableCell, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
        return;
    }
    buf.set_style(area, cell.style.patch(cell.content.style));
    for (dy, line) in cell.content.lines.iter().take(area.height as usize).enumerate() {
        let alignment = line
            .alignment
            .or(cell.content.alignment)
            .unwrap_or(Alignment::Left);
        let offset = alignment.offset(line.width().min(u16::MAX as usize) as u16, area.width);
        buf.set_line(area.x + offset, area.y + dy as u16, line, area.width - offset);
    }
}

impl Widget for Table {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut state = TableState {
            selected: self.selected_row,
            selected_column: self.selected_column,
            offset: self.offset,
        };
        StatefulWidget::render(self, area, buf, &mut state);
    }
}

impl StatefulWidget for Table {
    type State = TableState;

    fn render(&self, area: Rect, buf: &mut Buffer, state: &mut TableState) {
        let area = area.intersection(buf.area());
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.style);
        let inner = block::render_optional(self.block.as_ref(), area, buf);
        if inner.is_empty() {
            return;
        }

        let header_height = self
            .header
            .as_ref()
            .map_or(0, |h| h.height.saturating_add(h.bottom_margin))
            .min(inner.height);
        let footer_height = self
            .footer
            .as_ref()
            .map_or(0, |f| f.height.saturating_add(f.top_margin))
            .min(inner.height - header_height);
        let rows_area = Rect::new(
            inner.x,
            inner.y + header_height,
            inner.width,
            inner.height - header_height - footer_height,
        );

        let show_symbol = self.highlight_spacing.should_add(state.selected.is_some());
        let selection_width = if show_symbol {
            text::width(&self.highlight_symbol).min(u16::MAX as usize) as u16
        } else {
            0
        };
        let columns = self.columns(inner, selection_width);

        if let Some(header) = &self.header {
            let area = Rect::new(inner.x, inner.y, inner.width, header.height.min(header_height));
            self.render_row(header, area, &columns, buf);
        }
        if let Some(footer) = &self.footer {
            let height = footer.height.min(footer_height);
            let area = Rect::new(inner.x, inner.bottom() - height, inner.width, height);
            self.render_row(footer, area, &columns, buf);
        }

        if self.rows.is_empty() || rows_area.is_empty() {
            return;
        }
        if let Some(selected) = state.selected {
            if selected >= self.rows.len() {
                state.select(Some(self.rows.len() - 1));
            }
        }

        let heights: Vec<u16> = self.rows.iter().map(Row::total_height).collect();
        let (first, last) =
            scroll::visible_bounds(&heights, state.selected, state.offset, rows_area.height, 0);
        state.offset = first;

        let mut y = rows_area.y;
        for (index, row) in self.rows.iter().enumerate().take(last).skip(first) {
            let top = y.saturating_add(row.top_margin).min(rows_area.bottom());
            let height = row.height.min(rows_area.bottom() - top);
            let row_area = Rect::new(rows_area.x, top, rows_area.width, height);
            self.render_row(row, row_area, &columns, buf);

            if state.selected == Some(index) {
                if show_symbol {
                    buf.set_stringn(
                        row_area.x,
                        row_area.y,
                        &self.highlight_symbol,
                        selection_width as usize,
                        row.style,
                    );
                }
                buf.set_style(row_area, self.highlight_style);
            }
            y = top.saturating_add(height).saturating_add(row.bottom_margin);
            if y >= rows_area.bottom() {
                break;
            }
        }

        if let Some(column) = state.selected_column.and_then(|c| columns.get(c)) {
            let column_area = Rect::new(column.x, rows_area.y, column.width, rows_area.height);
            buf.set_style(column_area, self.column_highlight_style);
            if let Some(selected) = state.selected {
                if (first..last).contains(&selected) {
                    let offset_rows: u16 = heights[first..selected].iter().sum();
                    let row = &self.rows[selected];
                    let cell_area = Rect::new(
                        column.x,
                        rows_area.y + offset_rows + row.top_margin,
                        column.width,
                        row.height,
                    )
                    .intersection(rows_area);
                    buf.set_style(cell_area, self.cell_highlight_style);
                }
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

    fn sample() -> Table {
        Table::new(
            vec![Row::new(["a1", "b1"]), Row::new(["a2", "b2"]), Row::new(["a3", "b3"])],
            [Constraint::Length(3), Constraint::Length(3)],
        )
    }

    #[test]
    fn test_columns_and_header() {
        let table = sample().header(Row::new(["A", "B"]));
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 4));
        Widget::render(&table, buf.area(), &mut buf);
        assert_eq!(lines(&buf), vec!["A   B", "a1  b1", "a2  b2", "a3  b3"]);
    }

    #[test]
    fn test_selection_symbol_and_highlight() {
        let table = sample()
            .highlight_symbol(">")
            .highlight_style(Style::new().add_modifier(Modifier::REVERSED))
            .selected_row(Some(1));
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 3));
        Widget::render(&table, buf.area(), &mut buf);
        assert_eq!(lines(&buf), vec![" a1  b1", ">a2  b2", " a3  b3"]);
        assert!(buf.cell(9, 1).unwrap().modifier.contains(Modifier::REVERSED));
        assert!(!buf.cell(9, 0).unwrap().modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_auto_scroll_with_header_and_footer() {
        let table = sample()
            .header(Row::new(["A", "B"]))
            .footer(Row::new(["f", "g"]));
        let mut state = TableState::with_selected(Some(2));
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 4));
        StatefulWidget::render(&table, buf.area(), &mut buf, &mut state);
        assert_eq!(state.offset, 1);
        assert_eq!(lines(&buf), vec!["A   B", "a2  b2", "a3  b3", "f   g"]);
    }

    #[test]
    fn test_column_highlight() {
        let table = sample().column_highlight_style(Style::new().fg(Color::Green));
        let mut state = TableState::default();
        state.select_column(Some(1));
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 3));
        StatefulWidget::render(&table, buf.area(), &mut buf, &mut state);
        assert_eq!(buf.cell(4, 0).unwrap().fg, Color::Green);
        assert_eq!(buf.cell(0, 0).unwrap().fg, Color::Reset);
    }

    #[test]
    fn test_default_widths_split_evenly() {
        let table = Table::new(vec![Row::new(["x", "y"])], []).column_spacing(0);
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        Widget::render(&table, buf.area(), &mut buf);
        assert_eq!(lines(&buf), vec!["x  y"]);
    }

    #[test]
    fn test_row_json_forms() {
        let table: Table = serde_json::from_str(
            r#"{"rows": [["a", "b"], {"cells": ["c"], "height": 2}], "widths": [{"length": 2}, {"fill": 1}]}"#,
        )
        .unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].height, 2);
        assert_eq!(table.rows[0].height, 1);
        assert_eq!(table.column_spacing, 1);
        assert_eq!(table.flex, Flex::Legacy);
    }
}
