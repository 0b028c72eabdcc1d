//! BarChart: grouped bars, vertical (eighth-block tops) or horizontal.

use serde::{Deserialize, Serialize};

use super::block::{self, Block};
use super::Widget;
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::layout::Direction;
use crate::style::Style;
use crate::symbols::{FULL_BLOCK, VERTICAL_EIGHTHS};
use crate::text::{self, Alignment, Line};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BarRepr")]
pub struct Bar {
    pub value: u64,
    pub label: Option<Line>,
    /// Replaces the printed value.
    pub text_value: Option<String>,
    pub style: Style,
    pub value_style: Style,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BarRepr {
    Value(u64),
    Full {
        value: u64,
        #[serde(default)]
        label: Option<Line>,
        #[serde(default)]
        text_value: Option<String>,
        #[serde(default)]
        style: Style,
        #[serde(default)]
        value_style: Style,
    },
}

impl From<BarRepr> for Bar {
    fn from(repr: BarRepr) -> Self {
        match repr {
            BarRepr::Value(value) => Bar::new(value),
            BarRepr::Full {
                value,
                label,
                text_value,
                style,
                value_style,
            } => Bar {
                value,
                label,
                text_value,
                style,
                value_style,
            },
        }
    }
}

impl Bar {
    pub fn new(value: u64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<Line>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn text_value(mut self, text: impl Into<String>) -> Self {
        self.text_value = Some(text.into());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn value_text(&self) -> String {
        self.text_value
            .clone()
            .unwrap_or_else(|| self.value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BarGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Line>,
    pub bars: Vec<Bar>,
}

impl BarGroup {
    pub fn new(bars: impl IntoIterator<Item = Bar>) -> Self {
        Self {
            label: None,
            bars: bars.into_iter().collect(),
        }
    }

    pub fn label(mut self, label: impl Into<Line>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarChart {
    pub data: Vec<BarGroup>,
    pub bar_width: u16,
    pub bar_gap: u16,
    pub group_gap: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    pub style: Style,
    pub bar_style: Style,
    pub value_style: Style,
    pub label_style: Style,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

impl Default for BarChart {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            bar_width: 3,
            bar_gap: 1,
            group_gap: 0,
            max: None,
            style: Style::default(),
            bar_style: Style::default(),
            value_style: Style::default(),
            label_style: Style::default(),
            direction: Direction::Vertical,
            block: None,
        }
    }
}

impl BarChart {
    pub fn data(mut self, group: BarGroup) -> Self {
        self.data.push(group);
        self
    }

    pub fn bar_width(mut self, width: u16) -> Self {
        self.bar_width = width;
        self
    }

    pub fn bar_gap(mut self, gap: u16) -> Self {
        self.bar_gap = gap;
        self
    }

    pub fn group_gap(mut self, gap: u16) -> Self {
        self.group_gap = gap;
        self
    }

    pub fn max(mut self, max: u64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn bar_style(mut self, style: Style) -> Self {
        self.bar_style = style;
        self
    }

    pub fn value_style(mut self, style: Style) -> Self {
        self.value_style = style;
        self
    }

    pub fn label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    fn max_value(&self) -> u64 {
        self.max
            .unwrap_or_else(|| {
                self.data
                    .iter()
                    .flat_map(|g| g.bars.iter().map(|b| b.value))
                    .max()
                    .unwrap_or(0)
            })
            .max(1)
    }

    fn render_vertical(&self, area: Rect, buf: &mut Buffer) {
        let has_bar_labels = self
            .data
            .iter()
            .any(|g| g.bars.iter().any(|b| b.label.is_some()));
        let has_group_labels = self.data.iter().any(|g| g.label.is_some());
        let label_rows = u16::from(has_bar_labels) + u16::from(has_group_labels);
        let bar_height = area.height.saturating_sub(label_rows);
        let full = u64::from(bar_height) * 8;
        let max = self.max_value();

        let mut x = area.left();
        'groups: for group in &self.data {
            if group.bars.is_empty() {
                continue;
            }
            let group_start = x;
            for bar in &group.bars {
                if x + self.bar_width > area.right() {
                    break 'groups;
                }
                let style = self.bar_style.patch(bar.style);
                let mut eighths = (bar.value.saturating_mul(full) / max).min(full);
                for row in (0..bar_height).rev() {
                    let step = eighths.min(8);
                    for dx in 0..self.bar_width {
                        if let Some(cell) = buf.cell_mut(x + dx, area.top() + row) {
                            cell.set_symbol(VERTICAL_EIGHTHS[step as usize])
                                .set_style(style);
                        }
                    }
                    eighths -= step;
                }

                let value = bar.value_text();
                let value_width = text::width(&value) as u16;
                if bar.value != 0 && bar_height > 0 && value_width <= self.bar_width {
                    let vx = x + (self.bar_width - value_width) / 2;
                    let value_style = style.patch(self.value_style).patch(bar.value_style);
                    buf.set_stringn(
                        vx,
                        area.top() + bar_height - 1,
                        &value,
                        value_width as usize,
                        value_style,
                    );
                }
                if let Some(label) = &bar.label {
                    let label_area = Rect::new(x, area.top() + bar_height, self.bar_width, 1);
                    render_label(buf, label_area, label, self.label_style);
                }
                x += self.bar_width + self.bar_gap;
            }
            if let Some(label) = &group.label {
                let width = (x - group_start).saturating_sub(self.bar_gap);
                let row = area.top() + bar_height + u16::from(has_bar_labels);
                if row < area.bottom() {
                    let label_area = Rect::new(group_start, row, width, 1);
                    render_label(buf, label_area, label, self.label_style);
                }
            }
            x = x.saturating_add(self.group_gap);
        }
    }

    fn render_horizontal(&self, area: Rect, buf: &mut Buffer) {
        let label_width = self
            .data
            .iter()
            .flat_map(|g| g.bars.iter())
            .filter_map(|b| b.label.as_ref().map(Line::width))
            .max()
            .unwrap_or(0)
            .min(area.width as usize) as u16;
        let bars_x = if label_width > 0 {
            (area.left() + label_width + 1).min(area.right())
        } else {
            area.left()
        };
        let max_len = u64::from(area.right() - bars_x);
        let max = self.max_value();

        let mut y = area.top();
        'groups: for group in &self.data {
            for bar in &group.bars {
                if y + self.bar_width > area.bottom() {
                    break 'groups;
                }
                let style = self.bar_style.patch(bar.style);
                let len = (bar.value.saturating_mul(max_len) / max).min(max_len) as u16;
                for dy in 0..self.bar_width {
                    for dx in 0..len {
                        if let Some(cell) = buf.cell_mut(bars_x + dx, y + dy) {
                            cell.set_symbol(FULL_BLOCK).set_style(style);
                        }
                    }
                }
                if let Some(label) = &bar.label {
                    let label_row = y + self.bar_width.saturating_sub(1) / 2;
                    let label = label.clone().patch_style(self.label_style);
                    buf.set_line(area.left(), label_row, &label, label_width);
                }
                let value = bar.value_text();
                if bar.value != 0 && self.bar_width > 0 {
                    let value_style = style.patch(self.value_style).patch(bar.value_style);
                    let value_row = y + self.bar_width.saturating_sub(1) / 2;
                    buf.set_stringn(bars_x, value_row, &value, max_len as usize, value_style);
                }
                y += self.bar_width + self.bar_gap;
            }
            y = y.saturating_add(self.group_gap);
        }
    }
}

/// Center `label` in `area`, truncated to its width.
fn render_label(buf: &mut Buffer, area: Rect, label: &Line, style: Style) {
    let width = (label.width().min(u16::MAX as usize) as u16).min(area.width);
    let offset = label
        .alignment
        .unwrap_or(Alignment::Center)
        .offset(width, area.width);
    let line = label.clone().patch_style(style);
    buf.set_line(area.x + offset, area.y, &line, area.width - offset);
}

impl Widget for BarChart {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area());
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.style);
        let inner = block::render_optional(self.block.as_ref(), area, buf);
        if inner.is_empty() || self.bar_width == 0 {
            return;
        }
        match self.direction {
            Direction::Vertical => self.render_vertical(inner, buf),
            Direction::Horizontal => self.render_horizontal(inner, buf),
        }
    }
}
