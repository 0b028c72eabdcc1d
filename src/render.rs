//! Render Module — double-buffered frames with cell diffing.
//!
//! Responsibilities:
//! - Resize both buffers when the backend reports a new size
//! - Paint a frame into the current buffer through `Frame`
//! - Diff current vs previous to produce a minimal `CellUpdate` list
//! - Send the diff and cursor state to the `TerminalBackend`, then flush
//! - Swap buffers and record timing

use std::time::Instant;

use tracing::debug;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::frame::Frame;
use crate::geometry::{Position, Rect, Size};
use crate::terminal::TerminalBackend;

/// Counters from the most recent frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub frames: u64,
    pub diff_cells: usize,
    pub render_us: u64,
}

#[derive(Debug)]
pub struct Renderer {
    /// Painted by the frame in progress.
    current: Buffer,
    /// What the terminal shows.
    previous: Buffer,
    cursor: Option<Position>,
    cursor_visible: Option<bool>,
    stats: RenderStats,
}

impl Renderer {
    pub fn new(size: Size) -> Self {
        let area = Rect::from(size);
        Self {
            current: Buffer::empty(area),
            // Differs in size from `current`, so the first frame is a full paint.
            previous: Buffer::empty(Rect::ZERO),
            cursor: None,
            cursor_visible: None,
            stats: RenderStats::default(),
        }
    }

    pub fn area(&self) -> Rect {
        self.current.area()
    }

    /// Replace both buffers. The next frame repaints every cell.
    pub fn resize(&mut self, size: Size) {
        let area = Rect::from(size);
        if area == self.current.area() {
            return;
        }
        debug!(width = size.width, height = size.height, "renderer resized");
        self.current = Buffer::empty(area);
        self.previous = Buffer::empty(Rect::ZERO);
    }

    /// Force a full repaint on the next frame.
    pub fn invalidate(&mut self) {
        self.previous = Buffer::empty(Rect::ZERO);
        self.cursor_visible = None;
    }

    /// Execute the full render pipeline:
    /// 1. Match the backend size
    /// 2. Clear the current buffer and paint it with `paint`
    /// 3. Diff current vs previous
    /// 4. Send the diff and cursor to the backend, flush
    /// 5. Swap buffers
    pub fn draw<B, F>(&mut self, backend: &mut B, paint: F) -> Result<()>
    where
        B: TerminalBackend + ?Sized,
        F: FnOnce(&mut Frame) -> Result<()>,
    {
        let start = Instant::now();

        self.resize(backend.size()?);
        self.current.reset();

        let mut frame = Frame::new(&mut self.current, self.stats.frames);
        paint(&mut frame)?;
        let cursor = frame.cursor_position();

        let diff = self.previous.diff(&self.current);
        backend.write_diff(&diff)?;
        match cursor {
            Some(position) => {
                if self.cursor_visible != Some(true) {
                    backend.show_cursor()?;
                }
                backend.set_cursor(position)?;
            }
            None => {
                if self.cursor_visible != Some(false) {
                    backend.hide_cursor()?;
                }
            }
        }
        backend.flush()?;

        self.cursor_visible = Some(cursor.is_some());
        self.cursor = cursor;
        std::mem::swap(&mut self.current, &mut self.previous);
        if self.current.area() != self.previous.area() {
            self.current = Buffer::empty(self.previous.area());
        }

        self.stats = RenderStats {
            frames: self.stats.frames + 1,
            diff_cells: diff.len(),
            render_us: start.elapsed().as_micros() as u64,
        };
        debug!(
            frame = self.stats.frames,
            diff_cells = self.stats.diff_cells,
            render_us = self.stats.render_us,
            "render"
        );
        Ok(())
    }

    /// The last frame drawn.
    pub fn buffer(&self) -> &Buffer {
        &self.previous
    }

    pub fn cursor_position(&self) -> Option<Position> {
        self.cursor
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }
}
