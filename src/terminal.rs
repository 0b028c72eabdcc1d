//! Terminal Module — the backend seam between rendering and a real terminal.
//!
//! Responsibilities:
//! - `TerminalBackend`: mode switching, size, diff output, cursor, input
//! - `CrosstermBackend`: raw mode, alternate screen, mouse capture,
//!   bracketed paste and focus reporting, each as configured
//! - `TestBackend`: headless; keeps written cells in a buffer and serves
//!   injected events in FIFO order
//!
//! The renderer and session depend on the trait only, never on crossterm.

use std::any::Any;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::buffer::{Buffer, CellUpdate};
use crate::config::TerminalOptions;
use crate::error::Result;
use crate::event::Event;
use crate::geometry::{Position, Rect, Size};
use crate::input;
use crate::style::{Color, Modifier};
use crate::text;

// ============================================================================
// TerminalBackend Trait
// ============================================================================

pub trait TerminalBackend {
    /// Enter the modes requested by `options`.
    fn init(&mut self, options: &TerminalOptions) -> Result<()>;
    /// Leave every mode `init` entered. Safe to call more than once.
    fn restore(&mut self) -> Result<()>;
    fn size(&self) -> Result<Size>;
    fn write_diff(&mut self, diff: &[CellUpdate]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn set_cursor(&mut self, position: Position) -> Result<()>;
    fn hide_cursor(&mut self) -> Result<()>;
    fn show_cursor(&mut self) -> Result<()>;
    /// Wait for the next event. `Some(Duration::ZERO)` polls, `None` blocks.
    /// Returns `Event::None` when nothing arrived in time.
    fn read_event(&mut self, timeout: Option<Duration>) -> Result<Event>;

    /// Downcast support, used to reach a `TestBackend` behind a trait object.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<B: TerminalBackend + ?Sized> TerminalBackend for Box<B> {
    fn init(&mut self, options: &TerminalOptions) -> Result<()> {
        (**self).init(options)
    }

    fn restore(&mut self) -> Result<()> {
        (**self).restore()
    }

    fn size(&self) -> Result<Size> {
        (**self).size()
    }

    fn write_diff(&mut self, diff: &[CellUpdate]) -> Result<()> {
        (**self).write_diff(diff)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn set_cursor(&mut self, position: Position) -> Result<()> {
        (**self).set_cursor(position)
    }

    fn hide_cursor(&mut self) -> Result<()> {
        (**self).hide_cursor()
    }

    fn show_cursor(&mut self) -> Result<()> {
        (**self).show_cursor()
    }

    fn read_event(&mut self, timeout: Option<Duration>) -> Result<Event> {
        (**self).read_event(timeout)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        (**self).as_any_mut()
    }
}

// ============================================================================
// CrosstermBackend
// ============================================================================

/// Modes actually entered by `init`, so `restore` undoes exactly those.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ActiveModes {
    raw: bool,
    alternate_screen: bool,
    mouse_capture: bool,
    bracketed_paste: bool,
    focus_change: bool,
    cursor_hidden: bool,
}

pub struct CrosstermBackend<W: Write> {
    writer: W,
    size: Size,
    modes: ActiveModes,
}

impl CrosstermBackend<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermBackend<W> {
    pub fn new(writer: W) -> Self {
        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
        Self {
            writer,
            size: Size::new(width, height),
            modes: ActiveModes::default(),
        }
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}

fn attributes(modifier: Modifier) -> impl Iterator<Item = crossterm::style::Attribute> {
    use crossterm::style::Attribute;
    [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::SLOW_BLINK, Attribute::SlowBlink),
        (Modifier::RAPID_BLINK, Attribute::RapidBlink),
        (Modifier::REVERSED, Attribute::Reverse),
        (Modifier::HIDDEN, Attribute::Hidden),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
    ]
    .into_iter()
    .filter(move |(m, _)| modifier.contains(*m))
    .map(|(_, attribute)| attribute)
}

impl<W: Write + 'static> TerminalBackend for CrosstermBackend<W> {
    fn init(&mut self, options: &TerminalOptions) -> Result<()> {
        use crossterm::{
            cursor,
            event::{EnableBracketedPaste, EnableFocusChange, EnableMouseCapture},
            terminal::{enable_raw_mode, EnterAlternateScreen},
            ExecutableCommand,
        };

        enable_raw_mode()?;
        self.modes.raw = true;
        if options.alternate_screen {
            self.writer.execute(EnterAlternateScreen)?;
            self.modes.alternate_screen = true;
        }
        if options.mouse_capture {
            self.writer.execute(EnableMouseCapture)?;
            self.modes.mouse_capture = true;
        }
        if options.bracketed_paste {
            self.writer.execute(EnableBracketedPaste)?;
            self.modes.bracketed_paste = true;
        }
        if options.focus_change {
            self.writer.execute(EnableFocusChange)?;
            self.modes.focus_change = true;
        }
        if options.hide_cursor {
            self.writer.execute(cursor::Hide)?;
            self.modes.cursor_hidden = true;
        }

        let (width, height) = crossterm::terminal::size()?;
        self.size = Size::new(width, height);
        debug!(width, height, ?options, "terminal initialized");
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        use crossterm::{
            cursor,
            event::{DisableBracketedPaste, DisableFocusChange, DisableMouseCapture},
            style::{Attribute, SetAttribute},
            terminal::{disable_raw_mode, LeaveAlternateScreen},
            ExecutableCommand,
        };

        // Every step runs even when an earlier one failed; a mode stays
        // recorded until leaving it succeeds, so a later call retries it.
        let mut first_error: Option<io::Error> = None;
        let mut attempt = |result: io::Result<()>| match result {
            Ok(()) => true,
            Err(e) => {
                first_error.get_or_insert(e);
                false
            }
        };
        let writer = &mut self.writer;
        let modes = &mut self.modes;

        attempt(writer.execute(SetAttribute(Attribute::Reset)).map(|_| ()));
        if modes.cursor_hidden && attempt(writer.execute(cursor::Show).map(|_| ())) {
            modes.cursor_hidden = false;
        }
        if modes.focus_change && attempt(writer.execute(DisableFocusChange).map(|_| ())) {
            modes.focus_change = false;
        }
        if modes.bracketed_paste && attempt(writer.execute(DisableBracketedPaste).map(|_| ())) {
            modes.bracketed_paste = false;
        }
        if modes.mouse_capture && attempt(writer.execute(DisableMouseCapture).map(|_| ())) {
            modes.mouse_capture = false;
        }
        if modes.alternate_screen && attempt(writer.execute(LeaveAlternateScreen).map(|_| ())) {
            modes.alternate_screen = false;
        }
        if modes.raw && attempt(disable_raw_mode()) {
            modes.raw = false;
        }

        if let Some(e) = first_error {
            warn!(error = %e, "terminal restore incomplete");
            return Err(e.into());
        }
        debug!("terminal restored");
        Ok(())
    }

    fn size(&self) -> Result<Size> {
        Ok(crossterm::terminal::size()
            .map(|(width, height)| Size::new(width, height))
            .unwrap_or(self.size))
    }

    fn write_diff(&mut self, diff: &[CellUpdate]) -> Result<()> {
        use crossterm::{
            cursor::MoveTo,
            style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
            QueueableCommand,
        };

        let mut fg = Color::Reset;
        let mut bg = Color::Reset;
        let mut modifier = Modifier::empty();
        let mut next_position: Option<Position> = None;

        for update in diff {
            let cell = &update.cell;
            if next_position != Some(Position::new(update.x, update.y)) {
                self.writer.queue(MoveTo(update.x, update.y))?;
            }
            if cell.modifier != modifier {
                // SGR 0 also resets colors.
                self.writer.queue(SetAttribute(Attribute::Reset))?;
                for attribute in attributes(cell.modifier) {
                    self.writer.queue(SetAttribute(attribute))?;
                }
                modifier = cell.modifier;
                fg = Color::Reset;
                bg = Color::Reset;
            }
            if cell.fg != fg {
                self.writer.queue(SetForegroundColor(cell.fg.to_crossterm()))?;
                fg = cell.fg;
            }
            if cell.bg != bg {
                self.writer.queue(SetBackgroundColor(cell.bg.to_crossterm()))?;
                bg = cell.bg;
            }
            self.writer.queue(Print(cell.symbol()))?;
            let advance = text::width(cell.symbol()).max(1) as u16;
            next_position = Some(Position::new(update.x.saturating_add(advance), update.y));
        }

        self.writer.queue(SetForegroundColor(Color::Reset.to_crossterm()))?;
        self.writer.queue(SetBackgroundColor(Color::Reset.to_crossterm()))?;
        self.writer.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn set_cursor(&mut self, position: Position) -> Result<()> {
        use crossterm::{cursor::MoveTo, QueueableCommand};
        self.writer.queue(MoveTo(position.x, position.y))?;
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        use crossterm::{cursor, QueueableCommand};
        self.writer.queue(cursor::Hide)?;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        use crossterm::{cursor, QueueableCommand};
        self.writer.queue(cursor::Show)?;
        Ok(())
    }

    fn read_event(&mut self, timeout: Option<Duration>) -> Result<Event> {
        use crossterm::event;

        if let Some(timeout) = timeout {
            if !event::poll(timeout)? {
                return Ok(Event::None);
            }
        }
        let raw = event::read()?;
        trace!(?raw, "terminal event");
        let event = input::from_crossterm(raw).unwrap_or_default();
        if let Event::Resize { width, height } = event {
            self.size = Size::new(width, height);
        }
        Ok(event)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ============================================================================
// TestBackend (headless sessions and tests)
// ============================================================================

/// Headless backend. Written cells land in an internal buffer that tests
/// inspect; events come from `inject_event`.
#[derive(Debug)]
pub struct TestBackend {
    buffer: Buffer,
    cursor: Position,
    cursor_visible: bool,
    events: VecDeque<Event>,
    initialized: bool,
    flushes: usize,
}

impl TestBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            cursor: Position::default(),
            cursor_visible: true,
            events: VecDeque::new(),
            initialized: false,
            flushes: 0,
        }
    }

    /// What the terminal would show.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Change the reported size. Content is discarded, as on a real resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.buffer = Buffer::empty(Rect::new(0, 0, width, height));
    }

    pub fn inject_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Panic with both grids when the displayed rows differ from `expected`.
    #[track_caller]
    pub fn assert_buffer_lines<'a>(&self, expected: impl IntoIterator<Item = &'a str>) {
        let expected: Vec<String> = expected.into_iter().map(str::to_string).collect();
        let actual = self.buffer.content_lines();
        if actual != expected {
            panic!(
                "buffer mismatch\nexpected:\n{}\nactual:\n{}",
                expected.join("\n"),
                actual.join("\n")
            );
        }
    }
}

impl TerminalBackend for TestBackend {
    fn init(&mut self, options: &TerminalOptions) -> Result<()> {
        self.initialized = true;
        self.cursor_visible = !options.hide_cursor;
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.initialized = false;
        self.cursor_visible = true;
        Ok(())
    }

    fn size(&self) -> Result<Size> {
        let area = self.buffer.area();
        Ok(Size::new(area.width, area.height))
    }

    fn write_diff(&mut self, diff: &[CellUpdate]) -> Result<()> {
        for update in diff {
            self.buffer.set_cell(update.x, update.y, update.cell.clone());
            // A wide glyph covers the columns after it, as on a real terminal.
            let width = text::width(&update.cell.symbol).min(usize::from(u16::MAX)) as u16;
            for dx in 1..width {
                if let Some(cell) = self.buffer.cell_mut(update.x.saturating_add(dx), update.y) {
                    cell.reset();
                    cell.set_symbol("");
                }
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn set_cursor(&mut self, position: Position) -> Result<()> {
        self.cursor = position;
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.cursor_visible = false;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.cursor_visible = true;
        Ok(())
    }

    fn read_event(&mut self, _timeout: Option<Duration>) -> Result<Event> {
        Ok(self.events.pop_front().unwrap_or_default())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Cell;
    use crate::frame::Frame;
    use crate::render::Renderer;
    use crate::widgets::Paragraph;

    /// Rejects the first write, accepts the rest.
    #[derive(Default)]
    struct FailFirstWrite {
        failed: bool,
        written: Vec<u8>,
    }

    impl Write for FailFirstWrite {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn update(x: u16, y: u16, symbol: &str) -> CellUpdate {
        CellUpdate {
            x,
            y,
            cell: Cell::new(symbol),
        }
    }

    #[test]
    fn test_test_backend_applies_diff() {
        let mut backend = TestBackend::new(3, 2);
        backend
            .write_diff(&[update(0, 0, "a"), update(2, 1, "z"), update(9, 9, "!")])
            .unwrap();
        backend.assert_buffer_lines(["a  ", "  z"]);
    }

    #[test]
    fn test_test_backend_events_fifo() {
        let mut backend = TestBackend::new(1, 1);
        backend.inject_event(Event::key("a").unwrap());
        backend.inject_event(Event::FocusLost);
        assert!(backend.read_event(None).unwrap().is_key());
        assert!(backend.read_event(None).unwrap().is_focus_lost());
        assert!(backend.read_event(Some(Duration::ZERO)).unwrap().is_none());
    }

    #[test]
    #[should_panic(expected = "buffer mismatch")]
    fn test_assert_buffer_lines_reports_mismatch() {
        TestBackend::new(2, 1).assert_buffer_lines(["xx"]);
    }

    #[test]
    fn test_boxed_backend_downcasts() {
        let mut backend: Box<dyn TerminalBackend> = Box::new(TestBackend::new(4, 2));
        assert_eq!(backend.size().unwrap(), Size::new(4, 2));
        let test = backend.as_any_mut().downcast_mut::<TestBackend>();
        assert!(test.is_some());
    }

    #[test]
    fn test_crossterm_write_diff_sequences() {
        let mut backend = CrosstermBackend::new(Vec::new());
        let mut bold = Cell::new("b");
        bold.fg = Color::Red;
        bold.modifier = Modifier::BOLD;
        backend
            .write_diff(&[
                update(0, 0, "a"),
                CellUpdate { x: 1, y: 0, cell: bold },
                update(5, 1, "c"),
            ])
            .unwrap();
        let out = String::from_utf8(backend.writer_mut().clone()).unwrap();
        assert!(out.starts_with("\x1b[1;1Ha"));
        assert!(out.contains("\x1b[1m"));
        assert!(out.contains("\x1b[38;5;"));
        assert!(out.contains("\x1b[2;6H"));
        assert!(out.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_restore_continues_after_failed_step() {
        let mut backend = CrosstermBackend::new(FailFirstWrite::default());
        backend.modes = ActiveModes {
            alternate_screen: true,
            mouse_capture: true,
            cursor_hidden: true,
            ..ActiveModes::default()
        };
        assert!(backend.restore().is_err());

        let out = String::from_utf8_lossy(&backend.writer_mut().written).into_owned();
        assert!(out.contains("\x1b[?25h"));
        assert!(out.contains("\x1b[?1049l"));
        assert_eq!(backend.modes, ActiveModes::default());
        assert!(backend.restore().is_ok());
    }

    #[test]
    fn test_test_backend_wide_glyph_covers_next_column() {
        let mut backend = TestBackend::new(4, 1);
        let mut renderer = Renderer::new(Size::new(4, 1));
        for text in ["abcd", "你好"] {
            renderer
                .draw(&mut backend, |frame: &mut Frame| {
                    let area = frame.area();
                    frame.render_widget(Paragraph::new(text), area);
                    Ok(())
                })
                .unwrap();
        }
        backend.assert_buffer_lines(["你好"]);
        assert!(backend.buffer().cell(1, 0).unwrap().is_continuation());
    }
}
