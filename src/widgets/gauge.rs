//! Gauge and LineGauge: progress shown as a filled area or a filled line.

use serde::{Deserialize, Serialize};

use super::block::{self, Block};
use super::Widget;
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::style::{Color, Style};
use crate::symbols::{FULL_BLOCK, HORIZONTAL_EIGHTHS, LIGHT_SHADE};
use crate::text::{Line, Span};

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

fn percent_label(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round())
}

// ============================================================================
// Gauge
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gauge {
    pub ratio: f64,
    /// Defaults to the rounded percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Span>,
    pub style: Style,
    pub gauge_style: Style,
    /// Draw the fractional end cell with eighth blocks.
    pub use_unicode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

impl Default for Gauge {
    fn default() -> Self {
        Self {
            ratio: 0.0,
            label: None,
            style: Style::default(),
            gauge_style: Style::default(),
            use_unicode: true,
            block: None,
        }
    }
}

impl Gauge {
    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = clamp_ratio(ratio);
        self
    }

    pub fn percent(self, percent: u16) -> Self {
        self.ratio(f64::from(percent.min(100)) / 100.0)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Span::raw(label));
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn gauge_style(mut self, style: Style) -> Self {
        self.gauge_style = style;
        self
    }

    pub fn use_unicode(mut self, use_unicode: bool) -> Self {
        self.use_unicode = use_unicode;
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for Gauge {
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
        buf.set_style(inner, self.gauge_style);

        let ratio = clamp_ratio(self.ratio);
        let label = self
            .label
            .clone()
            .unwrap_or_else(|| Span::raw(percent_label(ratio)));
        let label_width = inner.width.min(label.width().min(u16::MAX as usize) as u16);
        let label_col = inner.left() + (inner.width - label_width) / 2;
        let label_row = inner.top() + inner.height / 2;

        let filled = f64::from(inner.width) * ratio;
        let end = inner.left()
            + if self.use_unicode {
                filled.floor() as u16
            } else {
                filled.round() as u16
            };
        let fg = self.gauge_style.fg.unwrap_or(Color::Reset);
        let bg = self.gauge_style.bg.unwrap_or(Color::Reset);
        for y in inner.top()..inner.bottom() {
            for x in inner.left()..end {
                let Some(cell) = buf.cell_mut(x, y) else {
                    continue;
                };
                let under_label =
                    y == label_row && x >= label_col && x <= label_col + label_width;
                if under_label {
                    // Inverted so the label stays readable over the bar.
                    cell.set_symbol(" ");
                    cell.fg = bg;
                    cell.bg = fg;
                } else {
                    cell.set_symbol(FULL_BLOCK);
                    cell.fg = fg;
                    cell.bg = bg;
                }
            }
            if self.use_unicode && ratio < 1.0 && end < inner.right() {
                let eighths = ((filled % 1.0) * 8.0).round() as usize;
                if let Some(cell) = buf.cell_mut(end, y) {
                    cell.set_symbol(HORIZONTAL_EIGHTHS[eighths.min(8)]);
                }
            }
        }
        buf.set_span(label_col, label_row, &label, label_width);
    }
}

// ============================================================================
// LineGauge
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineGauge {
    pub ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Line>,
    pub style: Style,
    pub filled_style: Style,
    pub unfilled_style: Style,
    pub filled_symbol: String,
    pub unfilled_symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

impl Default for LineGauge {
    fn default() -> Self {
        Self {
            ratio: 0.0,
            label: None,
            style: Style::default(),
            filled_style: Style::default(),
            unfilled_style: Style::default(),
            filled_symbol: FULL_BLOCK.to_string(),
            unfilled_symbol: LIGHT_SHADE.to_string(),
            block: None,
        }
    }
}

impl LineGauge {
    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = clamp_ratio(ratio);
        self
    }

    pub fn label(mut self, label: impl Into<Line>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn filled_style(mut self, style: Style) -> Self {
        self.filled_style = style;
        self
    }

    pub fn unfilled_style(mut self, style: Style) -> Self {
        self.unfilled_style = style;
        self
    }

    pub fn filled_symbol(mut self, symbol: &str) -> Self {
        self.filled_symbol = symbol.to_string();
        self
    }

    pub fn unfilled_symbol(mut self, symbol: &str) -> Self {
        self.unfilled_symbol = symbol.to_string();
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for LineGauge {
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

        let ratio = clamp_ratio(self.ratio);
        let label = self
            .label
            .clone()
            .unwrap_or_else(|| Line::raw(percent_label(ratio)));
        let (col, row) = buf.set_line(inner.left(), inner.top(), &label, inner.width);
        let start = col + 1;
        if start >= inner.right() {
            return;
        }
        let end = start + (f64::from(inner.right() - start) * ratio).floor() as u16;
        for x in start..inner.right() {
            let (symbol, style) = if x < end {
                (self.filled_symbol.as_str(), self.filled_style)
            } else {
                (self.unfilled_symbol.as_str(), self.unfilled_style)
            };
            if let Some(cell) = buf.cell_mut(x, row) {
                cell.set_symbol(symbol).set_style(style);
            }
        }
    }
}
