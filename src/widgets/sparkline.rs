//! Sparkline: one column per data point, drawn bottom-up with eighth blocks.

use serde::{Deserialize, Serialize};

use super::block::{self, Block};
use super::Widget;
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::style::Style;
use crate::symbols::VERTICAL_EIGHTHS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sparkline {
    pub data: Vec<u64>,
    /// Value drawn as a full column. Defaults to the largest data point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    pub style: Style,
    pub direction: RenderDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

impl Sparkline {
    pub fn new(data: impl IntoIterator<Item = u64>) -> Self {
        Self {
            data: data.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn max(mut self, max: u64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn direction(mut self, direction: RenderDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for Sparkline {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area());
        if area.is_empty() {
            return;
        }
        let inner = block::render_optional(self.block.as_ref(), area, buf);
        if inner.is_empty() {
            return;
        }

        let max = self
            .max
            .unwrap_or_else(|| self.data.iter().copied().max().unwrap_or(1));
        let full = u64::from(inner.height) * 8;
        let mut columns: Vec<u64> = self
            .data
            .iter()
            .take(inner.width as usize)
            .map(|&v| {
                if max == 0 {
                    0
                } else {
                    (v.saturating_mul(full) / max).min(full)
                }
            })
            .collect();

        for row in (0..inner.height).rev() {
            let y = inner.top() + row;
            for (i, eighths) in columns.iter_mut().enumerate() {
                let x = match self.direction {
                    RenderDirection::LeftToRight => inner.left() + i as u16,
                    RenderDirection::RightToLeft => inner.right() - i as u16 - 1,
                };
                let step = (*eighths).min(8);
                if let Some(cell) = buf.cell_mut(x, y) {
                    cell.set_symbol(VERTICAL_EIGHTHS[step as usize])
                        .set_style(self.style);
                }
                *eighths -= step;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    fn render(s: &Sparkline, w: u16, h: u16) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, w, h));
        s.render(buf.area(), &mut buf);
        buf
    }

    #[test]
    fn test_single_row_scaled_to_max() {
        let buf = render(&Sparkline::new([1, 2, 3, 4]), 4, 1);
        assert_eq!(buf.content_lines(), vec!["▂▄▆█"]);
    }

    #[test]
    fn test_two_rows_bottom_up() {
        let buf = render(&Sparkline::new([0, 1, 2]), 3, 2);
        assert_eq!(buf.content_lines(), vec!["  █", " ██"]);
    }

    #[test]
    fn test_explicit_max_and_overflow() {
        let buf = render(&Sparkline::new([2, 9]).max(4), 2, 1);
        assert_eq!(buf.content_lines(), vec!["▄█"]);
    }

    #[test]
    fn test_right_to_left_and_truncation() {
        let buf = render(
            &Sparkline::new([8, 4, 1, 8]).direction(RenderDirection::RightToLeft),
            3,
            1,
        );
        assert_eq!(buf.content_lines(), vec!["▁▄█"]);
    }

    #[test]
    fn test_all_zero_data() {
        let buf = render(&Sparkline::new([0, 0]).style(Style::new().fg(Color::Red)), 2, 1);
        assert_eq!(buf.content_lines(), vec!["  "]);
        assert_eq!(buf.cell(0, 0).unwrap().fg, Color::Red);
    }
}
