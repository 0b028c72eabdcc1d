//! Geometry primitives shared by layout, buffer, and widgets.
//!
//! All coordinates are terminal cells, origin at the top-left, with
//! half-open extents: a rect covers `[x, x + width) × [y, y + height)`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn left(&self) -> u16 {
        self.x
    }

    pub const fn top(&self) -> u16 {
        self.y
    }

    /// Right edge (exclusive).
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two rects. Disjoint rects yield an empty rect anchored at
    /// the clamped origin.
    pub fn intersection(&self, other: Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        }
    }

    pub fn intersects(&self, other: Rect) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Smallest rect containing both.
    pub fn union(&self, other: Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        }
    }

    /// Shrink by a margin on every side. Collapses to zero instead of
    /// underflowing.
    pub fn inner(&self, margin: Margin) -> Rect {
        let dw = margin.horizontal.saturating_mul(2);
        let dh = margin.vertical.saturating_mul(2);
        if self.width < dw || self.height < dh {
            return Rect::new(self.x, self.y, 0, 0);
        }
        Rect {
            x: self.x.saturating_add(margin.horizontal),
            y: self.y.saturating_add(margin.vertical),
            width: self.width - dw,
            height: self.height - dh,
        }
    }

    /// Move and shrink this rect so it fits inside `other`.
    pub fn clamp(&self, other: Rect) -> Rect {
        let width = self.width.min(other.width);
        let height = self.height.min(other.height);
        let x = self
            .x
            .clamp(other.x, other.right().saturating_sub(width).max(other.x));
        let y = self
            .y
            .clamp(other.y, other.bottom().saturating_sub(height).max(other.y));
        Rect::new(x, y, width, height)
    }

    /// Iterate rows as single-height rects.
    pub fn rows(&self) -> impl Iterator<Item = Rect> + '_ {
        (self.y..self.bottom()).map(move |y| Rect::new(self.x, y, self.width, 1))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..self.bottom())
            .flat_map(move |y| (self.x..self.right()).map(move |x| Position { x, y }))
    }

    pub const fn as_size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl From<Size> for Rect {
    fn from(size: Size) -> Self {
        Rect::new(0, 0, size.width, size.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Margin {
    #[serde(default)]
    pub horizontal: u16,
    #[serde(default)]
    pub vertical: u16,
}

impl Margin {
    pub const fn new(horizontal: u16, vertical: u16) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}
