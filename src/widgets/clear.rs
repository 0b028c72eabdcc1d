//! Clear: blanks its area so content underneath does not bleed through.

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::Widget;
use crate::buffer::Buffer;
use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Clear {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

impl Clear {
    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for Clear {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area());
        if area.is_empty() {
            return;
        }
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut(x, y) {
                    cell.reset();
                }
            }
        }
        if let Some(block) = &self.block {
            block.render(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, Style};
    use crate::widgets::block::Borders;

    #[test]
    fn test_clear_resets_cells() {
        let mut buf = Buffer::with_lines(["xxxx", "xxxx"]);
        buf.set_style(buf.area(), Style::new().bg(Color::Blue));
        Clear::default().render(Rect::new(1, 0, 2, 2), &mut buf);
        assert_eq!(buf.content_lines(), vec!["x  x", "x  x"]);
        assert_eq!(buf.cell(1, 0).unwrap().bg, Color::Reset);
        assert_eq!(buf.cell(0, 0).unwrap().bg, Color::Blue);
    }

    #[test]
    fn test_clear_then_block() {
        let mut buf = Buffer::with_lines(["xxx", "xxx", "xxx"]);
        let clear = Clear::default().block(Block::default().borders(Borders::ALL));
        clear.render(buf.area(), &mut buf);
        assert_eq!(buf.content_lines(), vec!["┌─┐", "│ │", "└─┘"]);
    }
}
