//! Canvas: world-coordinate shapes rasterized onto a marker grid.
//!
//! Each cell holds `Marker::resolution()` dots. Shapes set dots, then every
//! cell with at least one dot is painted with its marker glyph in the color
//! of the last shape that touched it. Labels go on top, in cell space.

use serde::{Deserialize, Serialize};

use super::block::{self, Block};
use super::Widget;
use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::style::{Color, Style};
use crate::symbols::{self, Marker, BRAILLE_BLANK, BRAILLE_DOTS};
use crate::text::Line;

// ============================================================================
// Grid
// ============================================================================

/// Dot raster covering `width` x `height` cells.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    width: u16,
    height: u16,
    marker: Marker,
    dots: Vec<bool>,
    colors: Vec<Option<Color>>,
}

impl Grid {
    pub(crate) fn new(width: u16, height: u16, marker: Marker) -> Self {
        let (rx, ry) = marker.resolution();
        let dots = usize::from(width) * usize::from(rx) * usize::from(height) * usize::from(ry);
        Self {
            width,
            height,
            marker,
            dots: vec![false; dots],
            colors: vec![None; usize::from(width) * usize::from(height)],
        }
    }

    /// Dot columns and rows.
    pub(crate) fn resolution(&self) -> (usize, usize) {
        let (rx, ry) = self.marker.resolution();
        (
            usize::from(self.width) * usize::from(rx),
            usize::from(self.height) * usize::from(ry),
        )
    }

    pub(crate) fn paint(&mut self, x: usize, y: usize, color: Color) {
        let (cols, rows) = self.resolution();
        if x >= cols || y >= rows {
            return;
        }
        let (rx, ry) = self.marker.resolution();
        self.dots[y * cols + x] = true;
        let cell = (y / usize::from(ry)) * usize::from(self.width) + x / usize::from(rx);
        self.colors[cell] = Some(color);
    }

    fn dot(&self, x: usize, y: usize) -> bool {
        let (cols, _) = self.resolution();
        self.dots.get(y * cols + x).copied().unwrap_or(false)
    }

    fn symbol(&self, cx: u16, cy: u16) -> Option<String> {
        let (rx, ry) = self.marker.resolution();
        let x0 = usize::from(cx) * usize::from(rx);
        let y0 = usize::from(cy) * usize::from(ry);
        match self.marker {
            Marker::Braille => {
                let mut bits = 0u32;
                for (row, masks) in BRAILLE_DOTS.iter().enumerate() {
                    for (col, mask) in masks.iter().enumerate() {
                        if self.dot(x0 + col, y0 + row) {
                            bits |= u32::from(*mask);
                        }
                    }
                }
                if bits == 0 {
                    return None;
                }
                char::from_u32(BRAILLE_BLANK + bits).map(String::from)
            }
            Marker::HalfBlock => {
                let (upper, lower) = (self.dot(x0, y0), self.dot(x0, y0 + 1));
                (upper || lower).then(|| symbols::half_block(upper, lower).to_string())
            }
            marker => self.dot(x0, y0).then(|| marker.symbol().to_string()),
        }
    }

    /// Paint every occupied cell into `area`, which must match the grid size.
    pub(crate) fn render(&self, area: Rect, buf: &mut Buffer) {
        for cy in 0..self.height.min(area.height) {
            for cx in 0..self.width.min(area.width) {
                let Some(symbol) = self.symbol(cx, cy) else {
                    continue;
                };
                let index = usize::from(cy) * usize::from(self.width) + usize::from(cx);
                let color = self.colors[index];
                if let Some(cell) = buf.cell_mut(area.x + cx, area.y + cy) {
                    cell.set_symbol(&symbol);
                    if let Some(color) = color {
                        cell.fg = color;
                    }
                }
            }
        }
    }
}

// ============================================================================
// Painter
// ============================================================================

/// Maps world coordinates onto a grid.
pub(crate) struct Painter<'a> {
    grid: &'a mut Grid,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl<'a> Painter<'a> {
    pub(crate) fn new(grid: &'a mut Grid, x_bounds: [f64; 2], y_bounds: [f64; 2]) -> Self {
        Self {
            grid,
            x_bounds,
            y_bounds,
        }
    }

    fn in_bounds(&self, x: f64, y: f64) -> bool {
        let [left, right] = self.x_bounds;
        let [bottom, top] = self.y_bounds;
        x >= left && x <= right && y >= bottom && y <= top
    }

    /// Fractional dot position, or `None` for degenerate bounds.
    fn project(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let [left, right] = self.x_bounds;
        let [bottom, top] = self.y_bounds;
        let (width, height) = (right - left, top - bottom);
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let (cols, rows) = self.grid.resolution();
        if cols == 0 || rows == 0 {
            return None;
        }
        let dx = (x - left) * (cols - 1) as f64 / width;
        let dy = (top - y) * (rows - 1) as f64 / height;
        Some((dx, dy))
    }

    pub(crate) fn point(&mut self, x: f64, y: f64, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        if let Some((dx, dy)) = self.project(x, y) {
            self.grid.paint(dx as usize, dy as usize, color);
        }
    }

    pub(crate) fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color) {
        let Some((x1, y1, x2, y2)) = clip_line(x1, y1, x2, y2, self.x_bounds, self.y_bounds)
        else {
            return;
        };
        let (Some((ax, ay)), Some((bx, by))) = (self.project(x1, y1), self.project(x2, y2)) else {
            return;
        };
        let steps = (bx - ax).abs().max((by - ay).abs()).ceil() as usize;
        if steps == 0 {
            self.grid.paint(ax as usize, ay as usize, color);
            return;
        }
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = ax + (bx - ax) * t;
            let y = ay + (by - ay) * t;
            self.grid.paint(x.round() as usize, y.round() as usize, color);
        }
    }
}

/// Liang-Barsky clip of a segment to the bounds rectangle.
fn clip_line(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    [xmin, xmax]: [f64; 2],
    [ymin, ymax]: [f64; 2],
) -> Option<(f64, f64, f64, f64)> {
    let (dx, dy) = (x2 - x1, y2 - y1);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, x1 - xmin), (dx, xmax - x1), (-dy, y1 - ymin), (dy, ymax - y1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((x1 + t0 * dx, y1 + t0 * dy, x1 + t1 * dx, y1 + t1 * dy))
}

// ============================================================================
// Shapes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Points {
        coords: Vec<(f64, f64)>,
        #[serde(default)]
        color: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        #[serde(default)]
        color: Color,
    },
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        color: Color,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        #[serde(default)]
        color: Color,
    },
    /// Text placed at a world position, drawn over the raster.
    Label { x: f64, y: f64, text: Line },
}

impl Shape {
    fn draw(&self, painter: &mut Painter<'_>) {
        match *self {
            Shape::Points { ref coords, color } => {
                for &(x, y) in coords {
                    painter.point(x, y, color);
                }
            }
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                color,
            } => painter.line(x1, y1, x2, y2, color),
            Shape::Rectangle {
                x,
                y,
                width,
                height,
                color,
            } => {
                let (right, top) = (x + width, y + height);
                painter.line(x, y, right, y, color);
                painter.line(x, top, right, top, color);
                painter.line(x, y, x, top, color);
                painter.line(right, y, right, top, color);
            }
            Shape::Circle {
                x,
                y,
                radius,
                color,
            } => {
                for degree in 0..360 {
                    let angle = f64::from(degree).to_radians();
                    painter.point(x + radius * angle.cos(), y + radius * angle.sin(), color);
                }
            }
            Shape::Label { .. } => {}
        }
    }
}

// ============================================================================
// Canvas
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub shapes: Vec<Shape>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub marker: Marker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            shapes: Vec::new(),
            x_bounds: [0.0, 100.0],
            y_bounds: [0.0, 100.0],
            marker: Marker::default(),
            background_color: None,
            block: None,
        }
    }
}

impl Canvas {
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn x_bounds(mut self, bounds: [f64; 2]) -> Self {
        self.x_bounds = bounds;
        self
    }

    pub fn y_bounds(mut self, bounds: [f64; 2]) -> Self {
        self.y_bounds = bounds;
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    fn render_labels(&self, area: Rect, buf: &mut Buffer) {
        let [left, right] = self.x_bounds;
        let [bottom, top] = self.y_bounds;
        let (width, height) = (right - left, top - bottom);
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        for shape in &self.shapes {
            let Shape::Label { x, y, ref text } = *shape else {
                continue;
            };
            if x < left || x > right || y < bottom || y > top {
                continue;
            }
            let cx = area.left() + ((x - left) * f64::from(area.width - 1) / width) as u16;
            let cy = area.top() + ((top - y) * f64::from(area.height - 1) / height) as u16;
            buf.set_line(cx, cy, text, area.right() - cx);
        }
    }
}

impl Widget for Canvas {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area());
        if area.is_empty() {
            return;
        }
        let inner = block::render_optional(self.block.as_ref(), area, buf);
        if inner.is_empty() {
            return;
        }
        if let Some(color) = self.background_color {
            buf.set_style(inner, Style::new().bg(color));
        }

        let mut grid = Grid::new(inner.width, inner.height, self.marker);
        let mut painter = Painter::new(&mut grid, self.x_bounds, self.y_bounds);
        for shape in &self.shapes {
            shape.draw(&mut painter);
        }
        grid.render(inner, buf);
        self.render_labels(inner, buf);
    }
}
