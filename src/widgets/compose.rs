//! Composite nodes: split layouts, centering, overlays, cursor placement,
//! externally-held state, and raw buffer commands.
//!
//! These carry child `WidgetNode`s or side effects rather than painting
//! content of their own; `render_node` in the parent module drives them.

use serde::{Deserialize, Serialize};

use super::WidgetNode;
use crate::buffer::{Buffer, Cell};
use crate::error::Result;
use crate::geometry::{Margin, Rect};
use crate::layout::{Constraint, Direction, Flex, Layout};
use crate::style::Style;
use crate::text;

// ============================================================================
// Layout split
// ============================================================================

/// Child `i` renders into rect `i` of the split. Children beyond the last
/// constraint are not rendered; rects without a child stay untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Split {
    pub direction: Direction,
    pub constraints: Vec<Constraint>,
    pub flex: Flex,
    pub margin: Margin,
    pub spacing: u16,
    pub children: Vec<WidgetNode>,
}

impl Split {
    pub fn new(direction: Direction, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        Self {
            direction,
            constraints: constraints.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn flex(mut self, flex: Flex) -> Self {
        self.flex = flex;
        self
    }

    pub fn child(mut self, child: impl Into<WidgetNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.direction, self.constraints.iter().copied())
            .flex(self.flex)
            .margin(self.margin)
            .spacing(self.spacing)
    }

    /// Validated child areas, one per constraint.
    pub fn areas(&self, area: Rect) -> Result<Vec<Rect>> {
        for constraint in &self.constraints {
            constraint.validate()?;
        }
        Ok(self.layout().split(area))
    }
}

// ============================================================================
// Center
// ============================================================================

fn default_percent() -> u16 {
    50
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub child: Box<WidgetNode>,
    #[serde(default = "default_percent")]
    pub width_percent: u16,
    #[serde(default = "default_percent")]
    pub height_percent: u16,
}

impl Center {
    pub fn new(child: impl Into<WidgetNode>) -> Self {
        Self {
            child: Box::new(child.into()),
            width_percent: default_percent(),
            height_percent: default_percent(),
        }
    }

    pub fn percent(mut self, width: u16, height: u16) -> Self {
        self.width_percent = width;
        self.height_percent = height;
        self
    }

    /// The centered sub-area: the middle slot of a vertical then a
    /// horizontal three-way percentage split.
    pub fn area(&self, area: Rect) -> Rect {
        let height = self.height_percent.min(100);
        let width = self.width_percent.min(100);
        let rows = Layout::vertical([
            Constraint::Percentage((100 - height) / 2),
            Constraint::Percentage(height),
            Constraint::Percentage((100 - height) / 2),
        ])
        .split(area);
        let middle = rows.get(1).copied().unwrap_or(Rect::ZERO);
        let columns = Layout::horizontal([
            Constraint::Percentage((100 - width) / 2),
            Constraint::Percentage(width),
            Constraint::Percentage((100 - width) / 2),
        ])
        .split(middle);
        columns.get(1).copied().unwrap_or(Rect::ZERO)
    }
}

// ============================================================================
// Overlay, cursor, stateful
// ============================================================================

/// Layers render in order into the same area; later layers paint over
/// earlier ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Overlay {
    pub layers: Vec<WidgetNode>,
}

impl Overlay {
    pub fn layer(mut self, layer: impl Into<WidgetNode>) -> Self {
        self.layers.push(layer.into());
        self
    }
}

/// Places the terminal cursor at an absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorNode {
    pub x: u16,
    pub y: u16,
}

/// Renders `widget` with the `StateStore` entry under `state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stateful {
    pub state: u32,
    pub widget: Box<WidgetNode>,
}

impl Stateful {
    pub fn new(state: u32, widget: impl Into<WidgetNode>) -> Self {
        Self {
            state,
            widget: Box::new(widget.into()),
        }
    }
}

// ============================================================================
// Draw
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawCommand {
    String {
        x: u16,
        y: u16,
        string: String,
        #[serde(default)]
        style: Style,
    },
    Cell {
        x: u16,
        y: u16,
        cell: Cell,
    },
}

/// Raw buffer writes with coordinates relative to the node's area.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Draw {
    pub commands: Vec<DrawCommand>,
}

impl Draw {
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area());
        for command in &self.commands {
            match command {
                DrawCommand::String {
                    x,
                    y,
                    string,
                    style,
                } => {
                    let (x, y) = (area.x.saturating_add(*x), area.y.saturating_add(*y));
                    if area.contains(x, y) {
                        let max_width = (area.right() - x) as usize;
                        buf.set_stringn(x, y, string, max_width, *style);
                    }
                }
                DrawCommand::Cell { x, y, cell } => {
                    let (x, y) = (area.x.saturating_add(*x), area.y.saturating_add(*y));
                    if !area.contains(x, y) {
                        continue;
                    }
                    if let Some(target) = buf.cell_mut(x, y) {
                        target.reset();
                    }
                    // One grapheme, written like text so wide glyphs and
                    // control characters get the same treatment.
                    let symbol = text::graphemes(&cell.symbol).next().unwrap_or(" ");
                    let max_width = usize::from(area.right() - x);
                    buf.set_stringn(x, y, symbol, max_width, cell.style());
                    if let Some(target) = buf.cell_mut(x, y) {
                        target.set_skip(cell.skip);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn test_center_area() {
        let center = Center::new(Overlay::default());
        assert_eq!(
            center.area(Rect::new(0, 0, 100, 100)),
            Rect::new(25, 25, 50, 50)
        );
        let full = center.clone().percent(100, 100);
        assert_eq!(full.area(Rect::new(0, 0, 7, 3)), Rect::new(0, 0, 7, 3));
    }

    #[test]
    fn test_split_rejects_bad_constraint() {
        let split = Split::new(Direction::Horizontal, [Constraint::Percentage(120)]);
        assert!(split.areas(Rect::new(0, 0, 10, 1)).is_err());
        let split = Split::new(Direction::Horizontal, Constraint::from_lengths([3, 7]));
        let areas = split.areas(Rect::new(0, 0, 10, 1)).unwrap();
        assert_eq!(areas, vec![Rect::new(0, 0, 3, 1), Rect::new(3, 0, 7, 1)]);
    }

    #[test]
    fn test_draw_relative_and_clipped() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 2));
        let draw = Draw {
            commands: vec![
                DrawCommand::String {
                    x: 1,
                    y: 0,
                    string: "abcdef".to_string(),
                    style: Style::default(),
                },
                DrawCommand::Cell {
                    x: 0,
                    y: 0,
                    cell: Cell {
                        fg: Color::Red,
                        ..Cell::new("#")
                    },
                },
                DrawCommand::Cell {
                    x: 9,
                    y: 0,
                    cell: Cell::new("!"),
                },
            ],
        };
        draw.render(Rect::new(1, 1, 3, 1), &mut buf);
        assert_eq!(buf.content_lines(), vec!["     ", " #ab "]);
        assert_eq!(buf.cell(1, 1).unwrap().fg, Color::Red);
    }

    #[test]
    fn test_draw_json() {
        let draw: Draw = serde_json::from_str(
            r#"{"commands": [
                {"type": "string", "x": 0, "y": 0, "string": "hi", "style": {"fg": "green"}},
                {"type": "cell", "x": 1, "y": 1, "cell": {"symbol": "x"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(draw.commands.len(), 2);
    }

    #[test]
    fn test_draw_cell_is_sanitized() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        let draw = Draw {
            commands: vec![
                DrawCommand::Cell {
                    x: 0,
                    y: 0,
                    cell: Cell::new("\x1b[2J"),
                },
                DrawCommand::Cell {
                    x: 1,
                    y: 0,
                    cell: Cell::new("你"),
                },
                DrawCommand::Cell {
                    x: 3,
                    y: 0,
                    cell: Cell::new("好"),
                },
            ],
        };
        draw.render(buf.area(), &mut buf);
        assert_eq!(buf.cell(0, 0).unwrap().symbol, " ");
        assert_eq!(buf.cell(1, 0).unwrap().symbol, "你");
        assert!(buf.cell(2, 0).unwrap().is_continuation());
        assert_eq!(buf.cell(3, 0).unwrap().symbol, " ");
        assert_eq!(buf.content_lines(), vec![" 你 "]);
    }
}
