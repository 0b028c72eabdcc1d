//! One frame being drawn: the target buffer plus the requested cursor.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::geometry::{Position, Rect};
use crate::state::StateStore;
use crate::widgets::{self, StatefulWidget, Widget, WidgetNode};

pub struct Frame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
    cursor_position: Option<Position>,
    count: u64,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(buffer: &'a mut Buffer, count: u64) -> Self {
        Self {
            area: buffer.area(),
            buffer,
            cursor_position: None,
            count,
        }
    }

    /// The full drawable area.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Frames drawn before this one.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        widget.render(area, self.buffer);
    }

    pub fn render_stateful_widget<W: StatefulWidget>(
        &mut self,
        widget: W,
        area: Rect,
        state: &mut W::State,
    ) {
        widget.render(area, self.buffer, state);
    }

    /// Render a node tree. A cursor node inside it overrides any cursor set
    /// earlier in the frame.
    pub fn render_node(
        &mut self,
        node: &WidgetNode,
        area: Rect,
        states: &mut StateStore,
    ) -> Result<()> {
        let mut cursor = None;
        widgets::render_node(node, area, self.buffer, &mut cursor, states)?;
        if cursor.is_some() {
            self.cursor_position = cursor;
        }
        Ok(())
    }

    /// Show the cursor at `position` after this frame. Without a call the
    /// cursor stays hidden.
    pub fn set_cursor_position(&mut self, position: Position) {
        self.cursor_position = Some(position);
    }

    pub fn cursor_position(&self) -> Option<Position> {
        self.cursor_position
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut *self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Paragraph, Stateful};

    #[test]
    fn test_render_widget_and_cursor() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        let mut frame = Frame::new(&mut buf, 0);
        let area = frame.area();
        frame.render_widget(Paragraph::new("hey"), area);
        frame.set_cursor_position(Position::new(3, 0));
        assert_eq!(frame.cursor_position(), Some(Position::new(3, 0)));
        assert_eq!(buf.content_lines(), vec!["hey "]);
    }

    #[test]
    fn test_render_node_propagates_errors() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        let mut frame = Frame::new(&mut buf, 0);
        let node = WidgetNode::from(Stateful::new(7, Paragraph::new("x")));
        let area = frame.area();
        assert!(frame.render_node(&node, area, &mut StateStore::new()).is_err());
    }
}
