//! Session Module — one terminal session and the application loop.
//!
//! Responsibilities:
//! - Own the backend and renderer for the lifetime of a session
//! - Draw frames from closures or widget trees
//! - Poll events, following resizes
//! - Expose the headless inspection surface (`cell_at`, `buffer_content`)
//! - Restore the terminal on every exit path, including unwinding

use std::io::Stdout;
use std::time::Duration;

use tracing::{trace, warn};

use crate::buffer::{Buffer, Cell};
use crate::config::TerminalOptions;
use crate::error::Result;
use crate::event::Event;
use crate::frame::Frame;
use crate::geometry::{Position, Size};
use crate::render::{RenderStats, Renderer};
use crate::state::StateStore;
use crate::terminal::{CrosstermBackend, TerminalBackend, TestBackend};
use crate::widgets::WidgetNode;

pub struct Session<B: TerminalBackend> {
    backend: B,
    renderer: Renderer,
    options: TerminalOptions,
    active: bool,
}

impl<B: TerminalBackend> Session<B> {
    /// Initialize `backend` with `options`. If initialization fails part
    /// way, whatever was entered is restored before the error is returned.
    pub fn new(backend: B, options: TerminalOptions) -> Result<Self> {
        let size = backend.size()?;
        let mut session = Self {
            backend,
            renderer: Renderer::new(size),
            options,
            active: true,
        };
        session.backend.init(&session.options)?;
        let size = session.backend.size()?;
        session.renderer.resize(size);
        Ok(session)
    }

    pub fn options(&self) -> &TerminalOptions {
        &self.options
    }

    /// Draw one frame with `paint`.
    pub fn draw<F: FnOnce(&mut Frame)>(&mut self, paint: F) -> Result<()> {
        self.renderer.draw(&mut self.backend, |frame| {
            paint(frame);
            Ok(())
        })
    }

    /// Draw one frame with a fallible `paint`. On error nothing is sent to
    /// the terminal.
    pub fn try_draw<F: FnOnce(&mut Frame) -> Result<()>>(&mut self, paint: F) -> Result<()> {
        self.renderer.draw(&mut self.backend, paint)
    }

    /// Draw `node` over the whole terminal.
    pub fn render(&mut self, node: &WidgetNode, states: &mut StateStore) -> Result<()> {
        self.renderer.draw(&mut self.backend, |frame| {
            let area = frame.area();
            frame.render_node(node, area, states)
        })
    }

    /// Next event, or `Event::None` if none arrived within `timeout`.
    /// `None` blocks until an event arrives.
    pub fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Event> {
        let event = self.backend.read_event(timeout)?;
        if let Event::Resize { width, height } = event {
            self.renderer.resize(Size::new(width, height));
        }
        if !event.is_none() {
            trace!(?event, "event");
        }
        Ok(event)
    }

    /// `poll_event` with the configured `poll_timeout_ms`.
    pub fn poll_default(&mut self) -> Result<Event> {
        self.poll_event(Some(self.options.poll_timeout()))
    }

    pub fn size(&self) -> Result<Size> {
        self.backend.size()
    }

    /// Resize the drawing surface. A headless backend changes size with it;
    /// a real terminal keeps reporting its own size on the next frame.
    pub fn resize(&mut self, size: Size) {
        if let Some(test) = self.backend.as_any_mut().downcast_mut::<TestBackend>() {
            test.resize(size.width, size.height);
        }
        self.renderer.resize(size);
    }

    /// The last frame drawn.
    pub fn buffer(&self) -> &Buffer {
        self.renderer.buffer()
    }

    pub fn cell_at(&self, x: u16, y: u16) -> Option<&Cell> {
        self.renderer.buffer().cell(x, y)
    }

    /// Rows of the last frame as text.
    pub fn buffer_content(&self) -> Vec<String> {
        self.renderer.buffer().content_lines()
    }

    pub fn cursor_position(&self) -> Option<Position> {
        self.renderer.cursor_position()
    }

    pub fn stats(&self) -> RenderStats {
        self.renderer.stats()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Queue an event for the next poll. Only a headless session accepts
    /// injected events; returns false otherwise.
    pub fn inject_event(&mut self, event: Event) -> bool {
        match self.backend.as_any_mut().downcast_mut::<TestBackend>() {
            Some(test) => {
                test.inject_event(event);
                true
            }
            None => false,
        }
    }

    /// Leave the terminal modes entered by `new`. After a failure the next
    /// call (or drop) tries again; after success later calls do nothing.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.backend.restore()?;
        self.active = false;
        Ok(())
    }
}

impl Session<TestBackend> {
    pub fn headless(width: u16, height: u16) -> Result<Self> {
        Self::new(TestBackend::new(width, height), TerminalOptions::default())
    }
}

impl<B: TerminalBackend> Drop for Session<B> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "terminal restore failed");
        }
    }
}

// ============================================================================
// Application loop entry points
// ============================================================================

/// Run `app` in a full-screen crossterm session. The terminal is restored
/// when `app` returns, fails, or panics.
pub fn run<T, F>(options: TerminalOptions, app: F) -> Result<T>
where
    F: FnOnce(&mut Session<CrosstermBackend<Stdout>>) -> Result<T>,
{
    run_with(CrosstermBackend::stdout(), options, app)
}

/// `run` over any backend.
pub fn run_with<B, T, F>(backend: B, options: TerminalOptions, app: F) -> Result<T>
where
    B: TerminalBackend,
    F: FnOnce(&mut Session<B>) -> Result<T>,
{
    let mut session = Session::new(backend, options)?;
    let result = app(&mut session);
    let restored = session.restore();
    let value = result?;
    restored?;
    Ok(value)
}
