//! Input Module — raw terminal bytes and crossterm events into `Event`s.
//!
//! Responsibilities:
//! - Byte-level decoder for xterm-style input (ESC, CSI, SS3, SGR mouse,
//!   bracketed paste, focus reports, kitty `CSI u` keys)
//! - Conversion of crossterm events, keeping only key presses
//!
//! The decoder is incremental: a sequence split across reads is completed
//! by the next `parse` call. Sequence and paste buffers are capped.

use tracing::trace;

use crate::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MediaKeyCode, ModifierKeyCode, MouseButton,
    MouseEvent, MouseEventKind,
};

/// Longest CSI sequence accepted before the decoder resynchronizes.
const MAX_CSI_LEN: usize = 256;

/// Paste content beyond this many bytes is dropped.
const MAX_PASTE_LEN: usize = 1024 * 1024;

const PASTE_END: &[u8] = b"\x1b[201~";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Ground,
    Escape,
    Csi,
    Ss3,
    /// Rest of an oversized CSI sequence, dropped up to its final byte.
    CsiDiscard,
    /// `alt` is set when the lead byte followed an ESC.
    Utf8 { have: u8, need: u8, alt: bool },
}

#[derive(Debug, Default)]
pub struct InputParser {
    state: State,
    seq: Vec<u8>,
    utf8: [u8; 4],
    paste: Option<Vec<u8>>,
    /// The last bytes of the paste, checked against the terminator.
    paste_tail: Vec<u8>,
    paste_seen: usize,
}

impl InputParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `input`, returning every event it completes.
    pub fn parse(&mut self, input: &[u8]) -> Vec<Event> {
        let mut events = Vec::new();
        for &byte in input {
            if let Some(event) = self.advance(byte) {
                events.push(event);
            }
        }
        events
    }

    /// Resolve a pending lone ESC once no more bytes are coming.
    pub fn flush(&mut self) -> Option<Event> {
        match self.state {
            State::Escape => {
                self.state = State::Ground;
                Some(Event::Key(KeyEvent::new(KeyCode::Esc)))
            }
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Ground && self.paste.is_none()
    }

    fn advance(&mut self, byte: u8) -> Option<Event> {
        if self.paste.is_some() {
            return self.paste_byte(byte);
        }
        match self.state {
            State::Ground => self.ground(byte),
            State::Escape => self.escape(byte),
            State::Csi => self.csi(byte),
            State::Ss3 => self.ss3(byte),
            State::CsiDiscard => self.csi_discard(byte),
            State::Utf8 { have, need, alt } => self.utf8_byte(byte, have, need, alt),
        }
    }

    fn ground(&mut self, byte: u8) -> Option<Event> {
        let key = |code| Some(Event::Key(KeyEvent::new(code)));
        let ctrl = |c: char| {
            Some(Event::Key(
                KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::CTRL),
            ))
        };
        match byte {
            0x1B => {
                self.state = State::Escape;
                None
            }
            0x00 => ctrl(' '),
            0x09 => key(KeyCode::Tab),
            0x0D | 0x0A => key(KeyCode::Enter),
            0x01..=0x1A => ctrl((byte - 1 + b'a') as char),
            0x7F => key(KeyCode::Backspace),
            0x20..=0x7E => key(KeyCode::Char(byte as char)),
            0xC0..=0xDF => self.begin_utf8(byte, 2),
            0xE0..=0xEF => self.begin_utf8(byte, 3),
            0xF0..=0xF7 => self.begin_utf8(byte, 4),
            _ => None,
        }
    }

    fn begin_utf8(&mut self, lead: u8, need: u8) -> Option<Event> {
        self.utf8[0] = lead;
        self.state = State::Utf8 {
            have: 1,
            need,
            alt: false,
        };
        None
    }

    fn utf8_byte(&mut self, byte: u8, have: u8, need: u8, alt: bool) -> Option<Event> {
        if byte & 0xC0 != 0x80 {
            // Broken sequence: drop it and reprocess this byte from ground.
            self.state = State::Ground;
            return self.ground(byte);
        }
        self.utf8[have as usize] = byte;
        let have = have + 1;
        if have < need {
            self.state = State::Utf8 { have, need, alt };
            return None;
        }
        self.state = State::Ground;
        std::str::from_utf8(&self.utf8[..need as usize])
            .ok()
            .and_then(|s| s.chars().next())
            .map(|c| {
                let modifiers = if alt {
                    KeyModifiers::ALT
                } else {
                    KeyModifiers::empty()
                };
                Event::Key(KeyEvent::new(KeyCode::Char(c)).with_modifiers(modifiers))
            })
    }

    fn escape(&mut self, byte: u8) -> Option<Event> {
        match byte {
            b'[' => {
                self.state = State::Csi;
                self.seq.clear();
                None
            }
            b'O' => {
                self.state = State::Ss3;
                None
            }
            // ESC ESC: the first one carried Alt; stay pending for the second.
            0x1B => Some(Event::Key(
                KeyEvent::new(KeyCode::Esc).with_modifiers(KeyModifiers::ALT),
            )),
            0x7F => {
                self.state = State::Ground;
                Some(Event::Key(
                    KeyEvent::new(KeyCode::Backspace).with_modifiers(KeyModifiers::ALT),
                ))
            }
            0x20..=0x7E => {
                self.state = State::Ground;
                Some(Event::Key(
                    KeyEvent::new(KeyCode::Char(byte as char)).with_modifiers(KeyModifiers::ALT),
                ))
            }
            0x00..=0x1A => {
                self.state = State::Ground;
                match self.ground(byte) {
                    Some(Event::Key(key)) => {
                        let modifiers = key.modifiers | KeyModifiers::ALT;
                        Some(Event::Key(key.with_modifiers(modifiers)))
                    }
                    other => other,
                }
            }
            0xC0..=0xF7 => {
                let need = match byte {
                    0xC0..=0xDF => 2,
                    0xE0..=0xEF => 3,
                    _ => 4,
                };
                self.utf8[0] = byte;
                self.state = State::Utf8 {
                    have: 1,
                    need,
                    alt: true,
                };
                None
            }
            _ => {
                self.state = State::Ground;
                None
            }
        }
    }

    fn ss3(&mut self, byte: u8) -> Option<Event> {
        self.state = State::Ground;
        let code = match byte {
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'R' => KeyCode::F(3),
            b'S' => KeyCode::F(4),
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            _ => return None,
        };
        Some(Event::Key(KeyEvent::new(code)))
    }

    fn csi(&mut self, byte: u8) -> Option<Event> {
        if self.seq.len() >= MAX_CSI_LEN {
            trace!(len = self.seq.len(), "oversized CSI sequence dropped");
            self.seq.clear();
            self.state = State::CsiDiscard;
            return self.csi_discard(byte);
        }
        match byte {
            b'0'..=b'9' | b';' | b':' | b'<' | b'=' | b'>' | b'?' => {
                self.seq.push(byte);
                None
            }
            b'A'..=b'Z' | b'a'..=b'z' | b'~' => {
                self.state = State::Ground;
                let params = std::mem::take(&mut self.seq);
                self.finish_csi(&params, byte)
            }
            _ => {
                self.state = State::Ground;
                self.seq.clear();
                None
            }
        }
    }

    fn csi_discard(&mut self, byte: u8) -> Option<Event> {
        match byte {
            0x1B => self.state = State::Escape,
            0x40..=0x7E => self.state = State::Ground,
            _ => {}
        }
        None
    }

    fn finish_csi(&mut self, params: &[u8], last: u8) -> Option<Event> {
        match (params, last) {
            (b"", b'I') => return Some(Event::FocusGained),
            (b"", b'O') => return Some(Event::FocusLost),
            (b"200", b'~') => {
                self.paste = Some(Vec::new());
                self.paste_tail.clear();
                self.paste_seen = 0;
                return None;
            }
            // A stray paste terminator outside a paste carries no content.
            (b"201", b'~') => return None,
            ([b'<', rest @ ..], b'M' | b'm') => return sgr_mouse(rest, last == b'M'),
            _ => {}
        }

        let modifiers = modifier_param(params);
        let code = match last {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'S' => KeyCode::F(4),
            b'Z' => KeyCode::BackTab,
            b'~' => tilde_code(first_param(params)?)?,
            b'u' => return kitty_key(params),
            _ => {
                trace!(params = %String::from_utf8_lossy(params), last, "unknown CSI sequence");
                return None;
            }
        };
        Some(Event::Key(KeyEvent::new(code).with_modifiers(modifiers)))
    }

    fn paste_byte(&mut self, byte: u8) -> Option<Event> {
        let seen = self.paste_seen;
        self.paste_seen += 1;
        self.paste_tail.push(byte);
        if self.paste_tail.len() > PASTE_END.len() {
            self.paste_tail.remove(0);
        }
        let buf = self.paste.as_mut()?;
        if self.paste_tail != PASTE_END {
            if buf.len() < MAX_PASTE_LEN {
                buf.push(byte);
            }
            return None;
        }
        // Drop the terminator bytes that were stored before this one.
        buf.truncate(MAX_PASTE_LEN.min(seen + 1 - PASTE_END.len()));
        let content = self.paste.take().unwrap_or_default();
        self.paste_tail.clear();
        Some(Event::Paste {
            content: String::from_utf8_lossy(&content).into_owned(),
        })
    }
}

fn first_param(params: &[u8]) -> Option<u32> {
    std::str::from_utf8(params)
        .ok()?
        .split(';')
        .next()?
        .split(':')
        .next()?
        .parse()
        .ok()
}

/// Second CSI parameter in xterm form: 1 + bit set (shift 1, alt 2, ctrl 4, super 8).
fn modifier_param(params: &[u8]) -> KeyModifiers {
    let value = std::str::from_utf8(params)
        .ok()
        .and_then(|s| s.split(';').nth(1))
        .and_then(|s| s.split(':').next())
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(1);
    xterm_modifiers(value)
}

fn xterm_modifiers(value: u32) -> KeyModifiers {
    let bits = value.saturating_sub(1);
    let mut mods = KeyModifiers::empty();
    if bits & 1 != 0 {
        mods |= KeyModifiers::SHIFT;
    }
    if bits & 2 != 0 {
        mods |= KeyModifiers::ALT;
    }
    if bits & 4 != 0 {
        mods |= KeyModifiers::CTRL;
    }
    if bits & 8 != 0 {
        mods |= KeyModifiers::SUPER;
    }
    if bits & 16 != 0 {
        mods |= KeyModifiers::HYPER;
    }
    if bits & 32 != 0 {
        mods |= KeyModifiers::META;
    }
    mods
}

fn tilde_code(num: u32) -> Option<KeyCode> {
    Some(match num {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        11 => KeyCode::F(1),
        12 => KeyCode::F(2),
        13 => KeyCode::F(3),
        14 => KeyCode::F(4),
        15 => KeyCode::F(5),
        17 => KeyCode::F(6),
        18 => KeyCode::F(7),
        19 => KeyCode::F(8),
        20 => KeyCode::F(9),
        21 => KeyCode::F(10),
        23 => KeyCode::F(11),
        24 => KeyCode::F(12),
        _ => return None,
    })
}

/// `CSI code[:alt] ; mods[:event] u`. Release events are dropped.
fn kitty_key(params: &[u8]) -> Option<Event> {
    let s = std::str::from_utf8(params).ok()?;
    let mut parts = s.split(';');
    let code: u32 = parts.next()?.split(':').next()?.parse().ok()?;
    let mut mod_part = parts.next().unwrap_or("").split(':');
    let mods = mod_part
        .next()
        .and_then(|v| v.parse().ok())
        .map(xterm_modifiers)
        .unwrap_or_default();
    if mod_part.next() == Some("3") {
        return None;
    }
    Some(Event::Key(KeyEvent::new(kitty_code(code)?).with_modifiers(mods)))
}

fn kitty_code(code: u32) -> Option<KeyCode> {
    use MediaKeyCode as M;
    use ModifierKeyCode as K;
    Some(match code {
        9 => KeyCode::Tab,
        13 => KeyCode::Enter,
        27 => KeyCode::Esc,
        8 | 127 => KeyCode::Backspace,
        57_344 => KeyCode::Esc,
        57_345 => KeyCode::Enter,
        57_346 => KeyCode::Tab,
        57_347 => KeyCode::Backspace,
        57_348 => KeyCode::Insert,
        57_349 => KeyCode::Delete,
        57_350 => KeyCode::Left,
        57_351 => KeyCode::Right,
        57_352 => KeyCode::Up,
        57_353 => KeyCode::Down,
        57_354 => KeyCode::PageUp,
        57_355 => KeyCode::PageDown,
        57_356 => KeyCode::Home,
        57_357 => KeyCode::End,
        57_358 => KeyCode::CapsLock,
        57_359 => KeyCode::ScrollLock,
        57_360 => KeyCode::NumLock,
        57_361 => KeyCode::PrintScreen,
        57_362 => KeyCode::Pause,
        57_363 => KeyCode::Menu,
        57_364..=57_387 => KeyCode::F((code - 57_364 + 1) as u8),
        57_427 => KeyCode::KeypadBegin,
        57_428 => KeyCode::Media(M::Play),
        57_429 => KeyCode::Media(M::Pause),
        57_430 => KeyCode::Media(M::PlayPause),
        57_431 => KeyCode::Media(M::Reverse),
        57_432 => KeyCode::Media(M::Stop),
        57_433 => KeyCode::Media(M::FastForward),
        57_434 => KeyCode::Media(M::Rewind),
        57_435 => KeyCode::Media(M::TrackNext),
        57_436 => KeyCode::Media(M::TrackPrevious),
        57_437 => KeyCode::Media(M::Record),
        57_438 => KeyCode::Media(M::LowerVolume),
        57_439 => KeyCode::Media(M::RaiseVolume),
        57_440 => KeyCode::Media(M::MuteVolume),
        57_441 => KeyCode::Modifier(K::LeftShift),
        57_442 => KeyCode::Modifier(K::LeftControl),
        57_443 => KeyCode::Modifier(K::LeftAlt),
        57_444 => KeyCode::Modifier(K::LeftSuper),
        57_445 => KeyCode::Modifier(K::LeftHyper),
        57_446 => KeyCode::Modifier(K::LeftMeta),
        57_447 => KeyCode::Modifier(K::RightShift),
        57_448 => KeyCode::Modifier(K::RightControl),
        57_449 => KeyCode::Modifier(K::RightAlt),
        57_450 => KeyCode::Modifier(K::RightSuper),
        57_451 => KeyCode::Modifier(K::RightHyper),
        57_452 => KeyCode::Modifier(K::RightMeta),
        57_453 => KeyCode::Modifier(K::IsoLevel3Shift),
        57_454 => KeyCode::Modifier(K::IsoLevel5Shift),
        57_388..=63_743 => return None,
        _ => KeyCode::Char(char::from_u32(code)?),
    })
}

/// SGR mouse report body after `<`: `b;x;y`, 1-based coordinates.
fn sgr_mouse(params: &[u8], pressed: bool) -> Option<Event> {
    let s = std::str::from_utf8(params).ok()?;
    let mut parts = s.split(';');
    let code: u16 = parts.next()?.parse().ok()?;
    let x: u16 = parts.next()?.parse().ok()?;
    let y: u16 = parts.next()?.parse().ok()?;

    let mut modifiers = KeyModifiers::empty();
    if code & 4 != 0 {
        modifiers |= KeyModifiers::SHIFT;
    }
    if code & 8 != 0 {
        modifiers |= KeyModifiers::ALT;
    }
    if code & 16 != 0 {
        modifiers |= KeyModifiers::CTRL;
    }

    let held = match code & 0b11 {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::None,
    };

    let (kind, button) = if code & 64 != 0 {
        let kind = match code & 0b11 {
            0 => MouseEventKind::ScrollUp,
            1 => MouseEventKind::ScrollDown,
            2 => MouseEventKind::ScrollLeft,
            _ => MouseEventKind::ScrollRight,
        };
        (kind, MouseButton::None)
    } else if code & 32 != 0 {
        if held == MouseButton::None {
            (MouseEventKind::Moved, MouseButton::None)
        } else {
            (MouseEventKind::Drag, held)
        }
    } else if pressed {
        (MouseEventKind::Down, held)
    } else {
        (MouseEventKind::Up, held)
    };

    Some(Event::Mouse(MouseEvent {
        kind,
        x: x.saturating_sub(1),
        y: y.saturating_sub(1),
        button,
        modifiers,
    }))
}

// ============================================================================
// crossterm conversion
// ============================================================================

/// Map a crossterm event. Key release and repeat events map to `None`.
pub fn from_crossterm(event: crossterm::event::Event) -> Option<Event> {
    use crossterm::event::{Event as Ct, KeyEventKind};

    match event {
        Ct::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(KeyEvent {
            code: key_code(key.code)?,
            modifiers: modifiers(key.modifiers),
        })),
        Ct::Key(_) => None,
        Ct::Mouse(mouse) => Some(Event::Mouse(mouse_event(mouse))),
        Ct::Resize(width, height) => Some(Event::Resize { width, height }),
        Ct::Paste(content) => Some(Event::Paste { content }),
        Ct::FocusGained => Some(Event::FocusGained),
        Ct::FocusLost => Some(Event::FocusLost),
    }
}

fn modifiers(m: crossterm::event::KeyModifiers) -> KeyModifiers {
    use crossterm::event::KeyModifiers as Ct;
    let pairs = [
        (Ct::SHIFT, KeyModifiers::SHIFT),
        (Ct::CONTROL, KeyModifiers::CTRL),
        (Ct::ALT, KeyModifiers::ALT),
        (Ct::SUPER, KeyModifiers::SUPER),
        (Ct::HYPER, KeyModifiers::HYPER),
        (Ct::META, KeyModifiers::META),
    ];
    pairs
        .iter()
        .filter(|(ct, _)| m.contains(*ct))
        .fold(KeyModifiers::empty(), |acc, (_, ours)| acc | *ours)
}

fn key_code(code: crossterm::event::KeyCode) -> Option<KeyCode> {
    use crossterm::event::{KeyCode as Ct, MediaKeyCode as CtM, ModifierKeyCode as CtK};
    use MediaKeyCode as M;
    use ModifierKeyCode as K;

    Some(match code {
        Ct::Char(c) => KeyCode::Char(c),
        Ct::F(n) => KeyCode::F(n),
        Ct::Backspace => KeyCode::Backspace,
        Ct::Enter => KeyCode::Enter,
        Ct::Left => KeyCode::Left,
        Ct::Right => KeyCode::Right,
        Ct::Up => KeyCode::Up,
        Ct::Down => KeyCode::Down,
        Ct::Home => KeyCode::Home,
        Ct::End => KeyCode::End,
        Ct::PageUp => KeyCode::PageUp,
        Ct::PageDown => KeyCode::PageDown,
        Ct::Tab => KeyCode::Tab,
        Ct::BackTab => KeyCode::BackTab,
        Ct::Delete => KeyCode::Delete,
        Ct::Insert => KeyCode::Insert,
        Ct::Esc => KeyCode::Esc,
        Ct::Null => KeyCode::Null,
        Ct::CapsLock => KeyCode::CapsLock,
        Ct::ScrollLock => KeyCode::ScrollLock,
        Ct::NumLock => KeyCode::NumLock,
        Ct::PrintScreen => KeyCode::PrintScreen,
        Ct::Pause => KeyCode::Pause,
        Ct::Menu => KeyCode::Menu,
        Ct::KeypadBegin => KeyCode::KeypadBegin,
        Ct::Media(m) => KeyCode::Media(match m {
            CtM::Play => M::Play,
            CtM::Pause => M::Pause,
            CtM::PlayPause => M::PlayPause,
            CtM::Reverse => M::Reverse,
            CtM::Stop => M::Stop,
            CtM::FastForward => M::FastForward,
            CtM::Rewind => M::Rewind,
            CtM::TrackNext => M::TrackNext,
            CtM::TrackPrevious => M::TrackPrevious,
            CtM::Record => M::Record,
            CtM::LowerVolume => M::LowerVolume,
            CtM::RaiseVolume => M::RaiseVolume,
            CtM::MuteVolume => M::MuteVolume,
        }),
        Ct::Modifier(k) => KeyCode::Modifier(match k {
            CtK::LeftShift => K::LeftShift,
            CtK::LeftControl => K::LeftControl,
            CtK::LeftAlt => K::LeftAlt,
            CtK::LeftSuper => K::LeftSuper,
            CtK::LeftHyper => K::LeftHyper,
            CtK::LeftMeta => K::LeftMeta,
            CtK::RightShift => K::RightShift,
            CtK::RightControl => K::RightControl,
            CtK::RightAlt => K::RightAlt,
            CtK::RightSuper => K::RightSuper,
            CtK::RightHyper => K::RightHyper,
            CtK::RightMeta => K::RightMeta,
            CtK::IsoLevel3Shift => K::IsoLevel3Shift,
            CtK::IsoLevel5Shift => K::IsoLevel5Shift,
        }),
    })
}

fn mouse_event(mouse: crossterm::event::MouseEvent) -> MouseEvent {
    use crossterm::event::{MouseButton as CtB, MouseEventKind as Ct};

    let button = |b: CtB| match b {
        CtB::Left => MouseButton::Left,
        CtB::Right => MouseButton::Right,
        CtB::Middle => MouseButton::Middle,
    };
    let (kind, button) = match mouse.kind {
        Ct::Down(b) => (MouseEventKind::Down, button(b)),
        Ct::Up(b) => (MouseEventKind::Up, button(b)),
        Ct::Drag(b) => (MouseEventKind::Drag, button(b)),
        Ct::Moved => (MouseEventKind::Moved, MouseButton::None),
        Ct::ScrollUp => (MouseEventKind::ScrollUp, MouseButton::None),
        Ct::ScrollDown => (MouseEventKind::ScrollDown, MouseButton::None),
        Ct::ScrollLeft => (MouseEventKind::ScrollLeft, MouseButton::None),
        Ct::ScrollRight => (MouseEventKind::ScrollRight, MouseButton::None),
    };
    MouseEvent {
        kind,
        x: mouse.column,
        y: mouse.row,
        button,
        modifiers: modifiers(mouse.modifiers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(bytes: &[u8]) -> Event {
        let events = InputParser::new().parse(bytes);
        assert_eq!(events.len(), 1, "events: {events:?}");
        events.into_iter().next().unwrap()
    }

    fn key(symbol: &str) -> Event {
        Event::key(symbol).unwrap()
    }

    #[test]
    fn test_printable_and_control_bytes() {
        assert_eq!(one(b"q"), key("q"));
        assert_eq!(one(b"\x03"), key("ctrl_c"));
        assert_eq!(one(b"\r"), key("enter"));
        assert_eq!(one(b"\t"), key("tab"));
        assert_eq!(one(b"\x7f"), key("backspace"));
        assert_eq!(one(b"\x00"), key("ctrl_ "));
    }

    #[test]
    fn test_utf8_across_reads() {
        let mut p = InputParser::new();
        let bytes = "é".as_bytes();
        assert!(p.parse(&bytes[..1]).is_empty());
        assert_eq!(p.parse(&bytes[1..]), vec![key("é")]);
    }

    #[test]
    fn test_lone_escape_needs_flush() {
        let mut p = InputParser::new();
        assert!(p.parse(b"\x1b").is_empty());
        assert!(!p.is_idle());
        assert_eq!(p.flush(), Some(key("esc")));
        assert!(p.is_idle());
    }

    #[test]
    fn test_alt_char() {
        assert_eq!(one(b"\x1bx"), key("alt_x"));
    }

    #[test]
    fn test_arrows_with_modifiers() {
        assert_eq!(one(b"\x1b[A"), key("up"));
        assert_eq!(one(b"\x1b[1;5C"), key("ctrl_right"));
        assert_eq!(one(b"\x1b[1;2H"), key("shift_home"));
        assert_eq!(one(b"\x1bOB"), key("down"));
        assert_eq!(one(b"\x1b[Z"), key("back_tab"));
    }

    #[test]
    fn test_tilde_keys() {
        assert_eq!(one(b"\x1b[3~"), key("delete"));
        assert_eq!(one(b"\x1b[5~"), key("page_up"));
        assert_eq!(one(b"\x1b[15~"), key("f5"));
        assert_eq!(one(b"\x1b[24;3~"), key("alt_f12"));
        assert_eq!(one(b"\x1bOP"), key("f1"));
    }

    #[test]
    fn test_sgr_mouse() {
        match one(b"\x1b[<0;10;5M") {
            Event::Mouse(m) => {
                assert_eq!(m.kind, MouseEventKind::Down);
                assert_eq!(m.button, MouseButton::Left);
                assert_eq!((m.x, m.y), (9, 4));
            }
            other => panic!("unexpected {other:?}"),
        }
        match one(b"\x1b[<2;1;1m") {
            Event::Mouse(m) => {
                assert_eq!(m.kind, MouseEventKind::Up);
                assert_eq!(m.button, MouseButton::Right);
            }
            other => panic!("unexpected {other:?}"),
        }
        match one(b"\x1b[<65;3;3M") {
            Event::Mouse(m) => {
                assert_eq!(m.kind, MouseEventKind::ScrollDown);
                assert_eq!(m.button, MouseButton::None);
            }
            other => panic!("unexpected {other:?}"),
        }
        match one(b"\x1b[<35;3;3M") {
            Event::Mouse(m) => assert_eq!(m.kind, MouseEventKind::Moved),
            other => panic!("unexpected {other:?}"),
        }
        match one(b"\x1b[<48;3;3M") {
            Event::Mouse(m) => {
                assert_eq!(m.kind, MouseEventKind::Drag);
                assert_eq!(m.modifiers, KeyModifiers::CTRL);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_focus_events() {
        assert_eq!(one(b"\x1b[I"), Event::FocusGained);
        assert_eq!(one(b"\x1b[O"), Event::FocusLost);
    }

    #[test]
    fn test_bracketed_paste() {
        assert_eq!(
            one(b"\x1b[200~hello\x1b[Aworld\x1b[201~"),
            Event::Paste {
                content: "hello\x1b[Aworld".into()
            }
        );
    }

    #[test]
    fn test_paste_split_across_reads() {
        let mut p = InputParser::new();
        assert!(p.parse(b"\x1b[200~abc\x1b[20").is_empty());
        assert_eq!(
            p.parse(b"1~x"),
            vec![Event::Paste { content: "abc".into() }, key("x")]
        );
    }

    #[test]
    fn test_oversized_paste_still_terminates() {
        let mut p = InputParser::new();
        let mut input = b"\x1b[200~".to_vec();
        input.extend(std::iter::repeat(b'a').take(MAX_PASTE_LEN + 10));
        input.extend_from_slice(b"\x1b[201~z");
        let events = p.parse(&input);
        assert_eq!(events.len(), 2);
        match &events[0] {
            Event::Paste { content } => assert_eq!(content.len(), MAX_PASTE_LEN),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(events[1], key("z"));
    }

    #[test]
    fn test_kitty_keys() {
        assert_eq!(one(b"\x1b[97;5u"), key("ctrl_a"));
        assert_eq!(one(b"\x1b[57429u"), key("media_pause"));
        assert_eq!(one(b"\x1b[57362u"), key("pause"));
        assert_eq!(one(b"\x1b[57441u"), key("left_shift"));
        assert!(InputParser::new().parse(b"\x1b[97;1:3u").is_empty());
    }

    #[test]
    fn test_overlong_csi_is_dropped() {
        let mut p = InputParser::new();
        let mut input = b"\x1b[".to_vec();
        input.extend(std::iter::repeat(b'1').take(MAX_CSI_LEN + 5));
        input.extend_from_slice(b"q");
        assert!(p.parse(&input).is_empty());
        assert!(p.is_idle());
        assert_eq!(p.parse(b"x"), vec![key("x")]);
    }

    #[test]
    fn test_alt_with_utf8_and_control_keys() {
        let mut p = InputParser::new();
        assert_eq!(p.parse("\x1bé".as_bytes()), vec![key("alt_é")]);
        assert_eq!(p.parse(b"\x1b\x18"), vec![key("ctrl_alt_x")]);
        assert_eq!(p.parse(b"\x1b\r"), vec![key("alt_enter")]);
        assert!(p.is_idle());
    }

    #[test]
    fn test_from_crossterm_drops_release() {
        use crossterm::event::{
            Event as Ct, KeyCode as CtCode, KeyEvent as CtKey, KeyEventKind,
            KeyModifiers as CtMods,
        };
        let press = CtKey::new(CtCode::Char('c'), CtMods::CONTROL);
        assert_eq!(from_crossterm(Ct::Key(press)), Some(key("ctrl_c")));

        let mut release = press;
        release.kind = KeyEventKind::Release;
        assert_eq!(from_crossterm(Ct::Key(release)), None);

        assert_eq!(
            from_crossterm(Ct::Resize(80, 24)),
            Some(Event::Resize { width: 80, height: 24 })
        );
    }
}
