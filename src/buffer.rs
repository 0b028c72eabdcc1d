//! Buffer Module — the 2D cell grid for one frame, and frame diffing.
//!
//! Responsibilities:
//! - `Cell`: one grapheme plus resolved colors and modifiers
//! - `Buffer`: row-major cells covering a `Rect`, written through clipped
//!   string/cell setters
//! - `diff`: the minimal list of `CellUpdate`s turning one frame into the next
//!
//! A buffer never grows or shrinks in place. On resize the renderer replaces
//! it wholesale and the next diff becomes a full repaint.

use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Rect};
use crate::style::{Color, Modifier, Style};
use crate::text::{self, Line, Span};

// ============================================================================
// Cell
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Cell {
    /// One grapheme cluster. Empty for the trailing half of a wide glyph.
    pub symbol: String,
    pub fg: Color,
    pub bg: Color,
    pub modifier: Modifier,
    /// Excluded from diffs; the terminal keeps whatever it shows there.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: " ".to_string(),
            fg: Color::Reset,
            bg: Color::Reset,
            modifier: Modifier::empty(),
            skip: false,
        }
    }
}

impl Cell {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Self::default()
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn set_symbol(&mut self, symbol: &str) -> &mut Self {
        self.symbol.clear();
        self.symbol.push_str(symbol);
        self
    }

    pub fn set_char(&mut self, ch: char) -> &mut Self {
        self.symbol.clear();
        self.symbol.push(ch);
        self
    }

    /// Apply the present fields of `style` onto this cell.
    pub fn set_style(&mut self, style: Style) -> &mut Self {
        if let Some(fg) = style.fg {
            self.fg = fg;
        }
        if let Some(bg) = style.bg {
            self.bg = bg;
        }
        self.modifier.insert(style.add_modifier);
        self.modifier.remove(style.sub_modifier);
        self
    }

    pub fn style(&self) -> Style {
        Style {
            fg: Some(self.fg),
            bg: Some(self.bg),
            add_modifier: self.modifier,
            sub_modifier: Modifier::empty(),
        }
    }

    /// True for the trailing half of a double-width glyph.
    pub fn is_continuation(&self) -> bool {
        self.symbol.is_empty()
    }

    pub fn set_skip(&mut self, skip: bool) -> &mut Self {
        self.skip = skip;
        self
    }

    pub fn reset(&mut self) {
        *self = Cell::default();
    }
}

/// A changed cell at an absolute position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

// ============================================================================
// Buffer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Buffer {
    pub area: Rect,
    pub content: Vec<Cell>,
}

impl Buffer {
    pub fn empty(area: Rect) -> Self {
        Self::filled(area, &Cell::default())
    }

    pub fn filled(area: Rect, cell: &Cell) -> Self {
        Self {
            area,
            content: vec![cell.clone(); area.area() as usize],
        }
    }

    /// Build a buffer from text rows; the width is that of the widest row.
    pub fn with_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let lines: Vec<&str> = lines.into_iter().collect();
        let width = lines.iter().map(|l| text::width(l)).max().unwrap_or(0) as u16;
        let mut buffer = Buffer::empty(Rect::new(0, 0, width, lines.len() as u16));
        for (y, line) in lines.iter().enumerate() {
            buffer.set_string(0, y as u16, line, Style::default());
        }
        buffer
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if !self.area.contains(x, y) {
            return None;
        }
        let row = (y - self.area.y) as usize;
        let col = (x - self.area.x) as usize;
        Some(row * self.area.width as usize + col)
    }

    fn pos_of(&self, index: usize) -> Position {
        let width = self.area.width.max(1) as usize;
        Position::new(
            self.area.x + (index % width) as u16,
            self.area.y + (index / width) as u16,
        )
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.content[i])
    }

    pub fn cell_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index_of(x, y).map(move |i| &mut self.content[i])
    }

    /// Replace one cell. Outside the buffer this is a no-op.
    pub fn set_cell(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index_of(x, y) {
            self.content[i] = cell;
        }
    }

    pub fn reset(&mut self) {
        for cell in &mut self.content {
            cell.reset();
        }
    }

    /// Compose `style` over every cell of `area` that lies in the buffer.
    pub fn set_style(&mut self, area: Rect, style: Style) {
        let area = self.area.intersection(area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = self.cell_mut(x, y) {
                    cell.set_style(style);
                }
            }
        }
    }

    /// Fill `area` with copies of `cell`.
    pub fn fill(&mut self, area: Rect, cell: &Cell) {
        let area = self.area.intersection(area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                self.set_cell(x, y, cell.clone());
            }
        }
    }

    pub fn set_string(&mut self, x: u16, y: u16, string: &str, style: Style) -> (u16, u16) {
        self.set_stringn(x, y, string, usize::MAX, style)
    }

    /// Write graphemes left to right, stopping at `max_width` cells or the
    /// right edge. A wide glyph that would straddle the limit is dropped.
    /// Returns the position after the last written cell.
    pub fn set_stringn(
        &mut self,
        x: u16,
        y: u16,
        string: &str,
        max_width: usize,
        style: Style,
    ) -> (u16, u16) {
        if !self.area.contains(x, y) {
            return (x, y);
        }
        let limit = (self.area.right() as usize).min(x as usize + max_width.min(u16::MAX as usize));
        let mut cursor = x as usize;
        for g in text::graphemes(string) {
            let w = text::width(g);
            if w == 0 || g.chars().any(char::is_control) {
                // Control characters and stray zero-width clusters.
                continue;
            }
            if cursor + w > limit {
                break;
            }
            self.put_grapheme(cursor as u16, y, g, w as u16, style);
            cursor += w;
        }
        (cursor as u16, y)
    }

    pub fn set_span(&mut self, x: u16, y: u16, span: &Span, max_width: u16) -> (u16, u16) {
        self.set_stringn(x, y, &span.content, max_width as usize, span.style)
    }

    pub fn set_line(&mut self, x: u16, y: u16, line: &Line, max_width: u16) -> (u16, u16) {
        let mut remaining = max_width;
        let mut cursor = x;
        for span in &line.spans {
            if remaining == 0 {
                break;
            }
            let style = line.style.patch(span.style);
            let (next, _) = self.set_stringn(cursor, y, &span.content, remaining as usize, style);
            remaining = remaining.saturating_sub(next.saturating_sub(cursor));
            cursor = next;
        }
        (cursor, y)
    }

    fn put_grapheme(&mut self, x: u16, y: u16, symbol: &str, w: u16, style: Style) {
        self.repair_wide_neighbours(x, y, w);
        if let Some(cell) = self.cell_mut(x, y) {
            cell.set_symbol(symbol).set_style(style);
        }
        for dx in 1..w {
            if let Some(cell) = self.cell_mut(x + dx, y) {
                cell.set_symbol("").set_style(style);
            }
        }
    }

    /// Blank out halves of wide glyphs that a write at `x..x+w` would split.
    fn repair_wide_neighbours(&mut self, x: u16, y: u16, w: u16) {
        if self.cell(x, y).is_some_and(Cell::is_continuation) {
            let mut lead = x;
            while lead > self.area.x {
                lead -= 1;
                match self.cell_mut(lead, y) {
                    Some(cell) if cell.is_continuation() => {
                        cell.set_symbol(" ");
                    }
                    Some(cell) => {
                        cell.set_symbol(" ");
                        break;
                    }
                    None => break,
                }
            }
        }
        let mut tail = x + w;
        while let Some(cell) = self.cell_mut(tail, y) {
            if !cell.is_continuation() {
                break;
            }
            cell.set_symbol(" ");
            tail += 1;
        }
    }

    /// Cells of `next` that differ from `self`, row-major.
    ///
    /// Positions covered by a wide glyph in `next` are skipped; cells that
    /// used to be covered by a wide glyph in `self` are re-emitted. When
    /// the dimensions differ every cell of `next` is reported.
    pub fn diff(&self, next: &Buffer) -> Vec<CellUpdate> {
        if self.area != next.area {
            return next
                .content
                .iter()
                .enumerate()
                .filter(|(_, cell)| !cell.skip)
                .map(|(i, cell)| {
                    let pos = next.pos_of(i);
                    CellUpdate {
                        x: pos.x,
                        y: pos.y,
                        cell: cell.clone(),
                    }
                })
                .collect();
        }

        let mut updates = Vec::new();
        let mut invalidated = 0usize;
        let mut to_skip = 0usize;
        for (i, (current, previous)) in next.content.iter().zip(&self.content).enumerate() {
            if !current.skip && (current != previous || invalidated > 0) && to_skip == 0 {
                let pos = next.pos_of(i);
                updates.push(CellUpdate {
                    x: pos.x,
                    y: pos.y,
                    cell: current.clone(),
                });
            }
            let current_width = text::width(&current.symbol);
            to_skip = current_width.saturating_sub(1);
            let affected = current_width.max(text::width(&previous.symbol));
            invalidated = affected.max(invalidated).saturating_sub(1);
        }
        updates
    }

    /// Text rows for inspection. Continuation cells contribute nothing.
    pub fn content_lines(&self) -> Vec<String> {
        let width = self.area.width as usize;
        if width == 0 {
            return vec![String::new(); self.area.height as usize];
        }
        self.content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol.as_str()).collect())
            .collect()
    }
}
