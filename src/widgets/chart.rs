//! Chart: x/y datasets plotted over labelled axes, with an optional legend.

use serde::{Deserialize, Serialize};

use super::block::{self, Block};
use super::canvas::{Grid, Painter};
use super::Widget;
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::style::{Color, Style};
use crate::symbols::{Marker, LINE_BOTTOM_LEFT, LINE_HORIZONTAL, LINE_VERTICAL};
use crate::text::{Alignment, Line, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    Scatter,
    #[default]
    Line,
    /// A vertical line from zero to each point.
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub name: String,
    pub data: Vec<(f64, f64)>,
    pub style: Style,
    pub marker: Marker,
    pub graph_type: GraphType,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            name: String::new(),
            data: Vec::new(),
            style: Style::default(),
            marker: Marker::Dot,
            graph_type: GraphType::default(),
        }
    }
}

impl Dataset {
    pub fn new(name: impl Into<String>, data: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self {
            name: name.into(),
            data: data.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn graph_type(mut self, graph_type: GraphType) -> Self {
        self.graph_type = graph_type;
        self
    }

    fn draw(&self, painter: &mut Painter<'_>, color: Color) {
        match self.graph_type {
            GraphType::Scatter => {
                for &(x, y) in &self.data {
                    painter.point(x, y, color);
                }
            }
            GraphType::Line => {
                if let [(x, y)] = self.data[..] {
                    painter.point(x, y, color);
                }
                for pair in self.data.windows(2) {
                    let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
                    painter.line(x1, y1, x2, y2, color);
                }
            }
            GraphType::Bar => {
                for &(x, y) in &self.data {
                    painter.line(x, 0.0, x, y, color);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Line>,
    pub bounds: [f64; 2],
    pub labels: Vec<Span>,
    pub style: Style,
    pub labels_alignment: Alignment,
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            title: None,
            bounds: [0.0, 10.0],
            labels: Vec::new(),
            style: Style::default(),
            labels_alignment: Alignment::Left,
        }
    }
}

impl Axis {
    pub fn title(mut self, title: impl Into<Line>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn bounds(mut self, bounds: [f64; 2]) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn labels<T: Into<String>>(mut self, labels: impl IntoIterator<Item = T>) -> Self {
        self.labels = labels.into_iter().map(Span::raw).collect();
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn labels_alignment(mut self, alignment: Alignment) -> Self {
        self.labels_alignment = alignment;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Chart {
    pub datasets: Vec<Dataset>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

/// Where each chart part lands inside the widget area.
#[derive(Debug, Default, PartialEq, Eq)]
struct ChartLayout {
    graph: Rect,
    x_labels_row: Option<u16>,
    y_labels: Option<Rect>,
    x_axis_row: Option<u16>,
    y_axis_col: Option<u16>,
}

impl Chart {
    pub fn new(datasets: Vec<Dataset>) -> Self {
        Self {
            datasets,
            ..Self::default()
        }
    }

    pub fn x_axis(mut self, axis: Axis) -> Self {
        self.x_axis = axis;
        self
    }

    pub fn y_axis(mut self, axis: Axis) -> Self {
        self.y_axis = axis;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    fn layout(&self, area: Rect) -> Option<ChartLayout> {
        let mut layout = ChartLayout::default();
        let mut x = area.left();
        let mut bottom = area.bottom();

        if !self.x_axis.labels.is_empty() && bottom > area.top() + 1 {
            bottom -= 1;
            layout.x_labels_row = Some(bottom);
        }
        if !self.y_axis.labels.is_empty() {
            let width = self
                .y_axis
                .labels
                .iter()
                .map(Span::width)
                .max()
                .unwrap_or(0)
                .min(area.width as usize / 2) as u16;
            if width > 0 {
                layout.y_labels = Some(Rect::new(x, area.top(), width, bottom - area.top()));
                x += width;
            }
        }
        if layout.x_labels_row.is_some() && bottom > area.top() + 1 {
            bottom -= 1;
            layout.x_axis_row = Some(bottom);
        }
        if layout.y_labels.is_some() && x + 1 < area.right() {
            layout.y_axis_col = Some(x);
            x += 1;
        }
        if x >= area.right() || bottom <= area.top() {
            return None;
        }
        layout.graph = Rect::new(x, area.top(), area.right() - x, bottom - area.top());
        Some(layout)
    }

    fn render_axes(&self, layout: &ChartLayout, buf: &mut Buffer) {
        let graph = layout.graph;
        if let Some(row) = layout.x_axis_row {
            for x in graph.left()..graph.right() {
                if let Some(cell) = buf.cell_mut(x, row) {
                    cell.set_symbol(LINE_HORIZONTAL).set_style(self.x_axis.style);
                }
            }
        }
        if let Some(col) = layout.y_axis_col {
            for y in graph.top()..graph.bottom() {
                if let Some(cell) = buf.cell_mut(col, y) {
                    cell.set_symbol(LINE_VERTICAL).set_style(self.y_axis.style);
                }
            }
        }
        if let (Some(row), Some(col)) = (layout.x_axis_row, layout.y_axis_col) {
            if let Some(cell) = buf.cell_mut(col, row) {
                cell.set_symbol(LINE_BOTTOM_LEFT).set_style(self.x_axis.style);
            }
        }
    }

    fn render_labels(&self, layout: &ChartLayout, area: Rect, buf: &mut Buffer) {
        let graph = layout.graph;
        if let Some(row) = layout.x_labels_row {
            let labels = &self.x_axis.labels;
            let last = labels.len().saturating_sub(1);
            for (i, label) in labels.iter().enumerate() {
                let width = (label.width() as u16).min(area.width);
                let anchor = if last == 0 {
                    graph.left()
                } else {
                    graph.left() + (u32::from(graph.width - 1) * i as u32 / last as u32) as u16
                };
                let x = if i == 0 {
                    anchor
                } else if i == last {
                    (anchor + 1).saturating_sub(width)
                } else {
                    anchor.saturating_sub(width / 2)
                };
                let x = x.max(area.left());
                let style = self.x_axis.style.patch(label.style);
                buf.set_stringn(x, row, &label.content, (area.right() - x) as usize, style);
            }
        }
        if let Some(column) = layout.y_labels {
            let labels = &self.y_axis.labels;
            let last = labels.len().saturating_sub(1);
            for (i, label) in labels.iter().enumerate() {
                let step = if last == 0 {
                    0
                } else {
                    (u32::from(graph.height - 1) * i as u32 / last as u32) as u16
                };
                let y = graph.bottom() - 1 - step;
                let width = (label.width() as u16).min(column.width);
                let x = column.x + self.y_axis.labels_alignment.offset(width, column.width);
                let style = self.y_axis.style.patch(label.style);
                buf.set_stringn(x, y, &label.content, width as usize, style);
            }
        }
    }

    fn render_titles(&self, layout: &ChartLayout, buf: &mut Buffer) {
        let graph = layout.graph;
        if let Some(title) = &self.x_axis.title {
            let width = title.width() as u16;
            if width < graph.width && graph.height > 1 {
                let title = title.clone().patch_style(self.x_axis.style);
                buf.set_line(graph.right() - width, graph.bottom() - 1, &title, width);
            }
        }
        if let Some(title) = &self.y_axis.title {
            let width = title.width() as u16;
            let x = layout.y_axis_col.unwrap_or(graph.left());
            if width + 1 < graph.width && graph.height > 1 {
                let title = title.clone().patch_style(self.y_axis.style);
                buf.set_line(x, graph.top(), &title, width);
            }
        }
    }

    fn render_legend(&self, graph: Rect, buf: &mut Buffer) {
        let named: Vec<&Dataset> = self.datasets.iter().filter(|d| !d.name.is_empty()).collect();
        if named.is_empty() {
            return;
        }
        let inner_width = named
            .iter()
            .map(|d| crate::text::width(&d.name))
            .max()
            .unwrap_or(0) as u16;
        let width = inner_width.saturating_add(2);
        let height = named.len() as u16 + 2;
        if width > graph.width || height > graph.height {
            return;
        }
        let legend = Rect::new(graph.right() - width, graph.top(), width, height);
        for position in legend.positions() {
            if let Some(cell) = buf.cell_mut(position.x, position.y) {
                cell.reset();
            }
        }
        Block::bordered().render(legend, buf);
        for (i, dataset) in named.iter().enumerate() {
            buf.set_stringn(
                legend.x + 1,
                legend.y + 1 + i as u16,
                &dataset.name,
                inner_width as usize,
                dataset.style,
            );
        }
    }
}

impl Widget for Chart {
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
        let Some(layout) = self.layout(inner) else {
            return;
        };

        self.render_axes(&layout, buf);
        self.render_labels(&layout, inner, buf);

        let graph = layout.graph;
        for dataset in &self.datasets {
            let mut grid = Grid::new(graph.width, graph.height, dataset.marker);
            let mut painter = Painter::new(&mut grid, self.x_axis.bounds, self.y_axis.bounds);
            let color = dataset.style.fg.unwrap_or(Color::Reset);
            dataset.draw(&mut painter, color);
            grid.render(graph, buf);
        }

        self.render_titles(&layout, buf);
        self.render_legend(graph, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(chart: &Chart, w: u16, h: u16) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, w, h));
        chart.render(buf.area(), &mut buf);
        buf
    }

    fn unit_axes(chart: Chart) -> Chart {
        chart
            .x_axis(Axis::default().bounds([0.0, 1.0]))
            .y_axis(Axis::default().bounds([0.0, 1.0]))
    }

    #[test]
    fn test_layout_reserves_labels_and_axes() {
        let chart = Chart::default()
            .x_axis(Axis::default().labels(["0", "10"]))
            .y_axis(Axis::default().labels(["lo", "hi"]));
        let layout = chart.layout(Rect::new(0, 0, 10, 5)).unwrap();
        assert_eq!(layout.x_labels_row, Some(4));
        assert_eq!(layout.x_axis_row, Some(3));
        assert_eq!(layout.y_labels, Some(Rect::new(0, 0, 2, 4)));
        assert_eq!(layout.y_axis_col, Some(2));
        assert_eq!(layout.graph, Rect::new(3, 0, 7, 3));
    }

    #[test]
    fn test_axes_and_labels_drawn() {
        let chart = Chart::default()
            .x_axis(Axis::default().labels(["0", "10"]))
            .y_axis(Axis::default().labels(["lo", "hi"]));
        let buf = render(&chart, 10, 5);
        assert_eq!(
            buf.content_lines(),
            vec![
                "hi│       ",
                "  │       ",
                "lo│       ",
                "  └───────",
                "   0    10",
            ]
        );
    }

    #[test]
    fn test_line_dataset_block_marker() {
        let chart = unit_axes(Chart::new(vec![Dataset::new("", [(0.0, 0.0), (1.0, 0.0)])
            .marker(Marker::Block)
            .style(Style::new().fg(Color::Cyan))]));
        let buf = render(&chart, 4, 2);
        assert_eq!(buf.content_lines(), vec!["    ", "████"]);
        assert_eq!(buf.cell(0, 1).unwrap().fg, Color::Cyan);
    }

    #[test]
    fn test_scatter_and_bar() {
        let scatter = unit_axes(Chart::new(vec![Dataset::new("", [(0.0, 1.0)])
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)]));
        assert_eq!(render(&scatter, 2, 2).content_lines(), vec!["• ", "  "]);

        let bars = unit_axes(Chart::new(vec![Dataset::new("", [(1.0, 1.0)])
            .marker(Marker::Block)
            .graph_type(GraphType::Bar)]));
        assert_eq!(render(&bars, 2, 2).content_lines(), vec![" █", " █"]);
    }

    #[test]
    fn test_legend_top_right() {
        let chart = unit_axes(Chart::new(vec![Dataset::new("ab", [])]));
        let buf = render(&chart, 8, 4);
        assert_eq!(
            buf.content_lines(),
            vec!["    ┌──┐", "    │ab│", "    └──┘", "        "]
        );
    }

    #[test]
    fn test_legend_hidden_when_too_large() {
        let chart = unit_axes(Chart::new(vec![Dataset::new("a long name", [])]));
        let buf = render(&chart, 6, 3);
        assert!(buf.content_lines().iter().all(|l| l.trim().is_empty()));
    }

    #[test]
    fn test_json() {
        let chart: Chart = serde_json::from_str(
            r#"{"datasets": [{"name": "s", "data": [[0, 1], [2, 3]], "graph_type": "scatter"}],
                "x_axis": {"bounds": [0, 5], "labels": ["a", "b"], "title": "x"}}"#,
        )
        .unwrap();
        assert_eq!(chart.datasets[0].data, vec![(0.0, 1.0), (2.0, 3.0)]);
        assert_eq!(chart.datasets[0].marker, Marker::Dot);
        assert_eq!(chart.x_axis.bounds, [0.0, 5.0]);
        assert_eq!(chart.y_axis.bounds, [0.0, 10.0]);
    }
}
