//! Event Module — the typed input event model.
//!
//! Responsibilities:
//! - Closed `Event` variant set (key, mouse, resize, paste, focus, none)
//! - Canonical key names and kinds, with system vs. media keys namespaced
//! - Modifier normalization: a bit set rendered as sorted names, so equality
//!   and symbol form (`ctrl_shift_c`) are order-independent
//! - Named-key matching (`matches("pgup")`, `matches("reverse_tab")`)
//! - JSON form for the host binding, tagged by `"type"`
//!
//! Decoding raw bytes into these events lives in `input`.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================================================
// Modifiers
// ============================================================================

bitflags! {
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL  = 0b0000_0010;
        const ALT   = 0b0000_0100;
        const SUPER = 0b0000_1000;
        const HYPER = 0b0001_0000;
        const META  = 0b0010_0000;
    }
}

/// Alphabetical, which is the canonical rendering order.
const MODIFIER_NAMES: [(&str, KeyModifiers); 6] = [
    ("alt", KeyModifiers::ALT),
    ("ctrl", KeyModifiers::CTRL),
    ("hyper", KeyModifiers::HYPER),
    ("meta", KeyModifiers::META),
    ("shift", KeyModifiers::SHIFT),
    ("super", KeyModifiers::SUPER),
];

impl KeyModifiers {
    pub fn parse_name(name: &str) -> Option<KeyModifiers> {
        let name = match name {
            "control" => "ctrl",
            "option" => "alt",
            "win" | "command" | "cmd" | "tux" => "super",
            other => other,
        };
        MODIFIER_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, m)| *m)
    }

    /// Sorted, deduplicated names.
    pub fn names(self) -> Vec<&'static str> {
        MODIFIER_NAMES
            .iter()
            .filter(|(_, m)| self.contains(*m))
            .map(|(n, _)| *n)
            .collect()
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<KeyModifiers, Error> {
        names.iter().try_fold(KeyModifiers::empty(), |acc, n| {
            KeyModifiers::parse_name(n.as_ref())
                .map(|m| acc | m)
                .ok_or_else(|| Error::InvalidKey(format!("unknown modifier: {}", n.as_ref())))
        })
    }
}

// ============================================================================
// Key codes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKeyCode {
    Play,
    Pause,
    PlayPause,
    Reverse,
    Stop,
    FastForward,
    Rewind,
    TrackNext,
    TrackPrevious,
    Record,
    LowerVolume,
    RaiseVolume,
    MuteVolume,
}

const MEDIA_NAMES: [(&str, MediaKeyCode); 13] = [
    ("media_play", MediaKeyCode::Play),
    ("media_pause", MediaKeyCode::Pause),
    ("media_play_pause", MediaKeyCode::PlayPause),
    ("media_reverse", MediaKeyCode::Reverse),
    ("media_stop", MediaKeyCode::Stop),
    ("media_fast_forward", MediaKeyCode::FastForward),
    ("media_rewind", MediaKeyCode::Rewind),
    ("media_track_next", MediaKeyCode::TrackNext),
    ("media_track_previous", MediaKeyCode::TrackPrevious),
    ("media_record", MediaKeyCode::Record),
    ("media_lower_volume", MediaKeyCode::LowerVolume),
    ("media_raise_volume", MediaKeyCode::RaiseVolume),
    ("media_mute_volume", MediaKeyCode::MuteVolume),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKeyCode {
    LeftShift,
    LeftControl,
    LeftAlt,
    LeftSuper,
    LeftHyper,
    LeftMeta,
    RightShift,
    RightControl,
    RightAlt,
    RightSuper,
    RightHyper,
    RightMeta,
    IsoLevel3Shift,
    IsoLevel5Shift,
}

const MODIFIER_KEY_NAMES: [(&str, ModifierKeyCode); 14] = [
    ("left_shift", ModifierKeyCode::LeftShift),
    ("left_control", ModifierKeyCode::LeftControl),
    ("left_alt", ModifierKeyCode::LeftAlt),
    ("left_super", ModifierKeyCode::LeftSuper),
    ("left_hyper", ModifierKeyCode::LeftHyper),
    ("left_meta", ModifierKeyCode::LeftMeta),
    ("right_shift", ModifierKeyCode::RightShift),
    ("right_control", ModifierKeyCode::RightControl),
    ("right_alt", ModifierKeyCode::RightAlt),
    ("right_super", ModifierKeyCode::RightSuper),
    ("right_hyper", ModifierKeyCode::RightHyper),
    ("right_meta", ModifierKeyCode::RightMeta),
    ("iso_level3_shift", ModifierKeyCode::IsoLevel3Shift),
    ("iso_level5_shift", ModifierKeyCode::IsoLevel5Shift),
];

impl ModifierKeyCode {
    /// The modifier this key sets while held, if any.
    pub fn modifier(self) -> KeyModifiers {
        use ModifierKeyCode::*;
        match self {
            LeftShift | RightShift => KeyModifiers::SHIFT,
            LeftControl | RightControl => KeyModifiers::CTRL,
            LeftAlt | RightAlt => KeyModifiers::ALT,
            LeftSuper | RightSuper => KeyModifiers::SUPER,
            LeftHyper | RightHyper => KeyModifiers::HYPER,
            LeftMeta | RightMeta => KeyModifiers::META,
            IsoLevel3Shift | IsoLevel5Shift => KeyModifiers::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    F(u8),
    Backspace,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    BackTab,
    Delete,
    Insert,
    Esc,
    Null,
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    Menu,
    KeypadBegin,
    Media(MediaKeyCode),
    Modifier(ModifierKeyCode),
}

const NAMED_KEYS: [(&str, KeyCode); 23] = [
    ("backspace", KeyCode::Backspace),
    ("enter", KeyCode::Enter),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("page_up", KeyCode::PageUp),
    ("page_down", KeyCode::PageDown),
    ("tab", KeyCode::Tab),
    ("back_tab", KeyCode::BackTab),
    ("delete", KeyCode::Delete),
    ("insert", KeyCode::Insert),
    ("esc", KeyCode::Esc),
    ("null", KeyCode::Null),
    ("caps_lock", KeyCode::CapsLock),
    ("scroll_lock", KeyCode::ScrollLock),
    ("num_lock", KeyCode::NumLock),
    ("print_screen", KeyCode::PrintScreen),
    ("pause", KeyCode::Pause),
    ("menu", KeyCode::Menu),
    ("keypad_begin", KeyCode::KeypadBegin),
];

/// Coarse classification of a key, derived from its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Standard,
    Function,
    Media,
    Modifier,
    System,
}

impl KeyKind {
    pub fn name(self) -> &'static str {
        match self {
            KeyKind::Standard => "standard",
            KeyKind::Function => "function",
            KeyKind::Media => "media",
            KeyKind::Modifier => "modifier",
            KeyKind::System => "system",
        }
    }
}

impl KeyCode {
    /// Canonical name: the character itself for text keys.
    pub fn name(&self) -> String {
        match self {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("f{n}"),
            KeyCode::Media(m) => lookup_name(&MEDIA_NAMES, m).to_string(),
            KeyCode::Modifier(m) => lookup_name(&MODIFIER_KEY_NAMES, m).to_string(),
            named => lookup_name(&NAMED_KEYS, named).to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<KeyCode> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::Char(c));
        }
        if let Some(n) = name.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=24).contains(&n) {
                return Some(KeyCode::F(n));
            }
        }
        lookup_code(&NAMED_KEYS, name)
            .or_else(|| lookup_code(&MEDIA_NAMES, name).map(KeyCode::Media))
            .or_else(|| lookup_code(&MODIFIER_KEY_NAMES, name).map(KeyCode::Modifier))
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            KeyCode::F(_) => KeyKind::Function,
            KeyCode::Media(_) => KeyKind::Media,
            KeyCode::Modifier(_) => KeyKind::Modifier,
            KeyCode::Esc
            | KeyCode::CapsLock
            | KeyCode::ScrollLock
            | KeyCode::NumLock
            | KeyCode::PrintScreen
            | KeyCode::Pause
            | KeyCode::Menu
            | KeyCode::KeypadBegin => KeyKind::System,
            _ => KeyKind::Standard,
        }
    }
}

fn lookup_name<T: PartialEq>(table: &[(&'static str, T)], value: &T) -> &'static str {
    table
        .iter()
        .find(|(_, v)| v == value)
        .map(|(n, _)| *n)
        .unwrap_or("unknown")
}

fn lookup_code<T: Copy>(table: &[(&'static str, T)], name: &str) -> Option<T> {
    table.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

// ============================================================================
// Key events
// ============================================================================

/// Aliases accepted by `KeyEvent::matches` for unmodified keys.
const KEY_ALIASES: [(&str, &str); 13] = [
    ("return", "enter"),
    ("back", "backspace"),
    ("escape", "esc"),
    ("del", "delete"),
    ("ins", "insert"),
    ("pgup", "page_up"),
    ("pageup", "page_up"),
    ("pgdn", "page_down"),
    ("pagedown", "page_down"),
    ("scrlk", "scroll_lock"),
    ("scroll", "scroll_lock"),
    ("prtsc", "print_screen"),
    ("print", "print_screen"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    pub const fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn kind(&self) -> KeyKind {
        self.code.kind()
    }

    /// Parse `"ctrl_shift_c"`: leading modifier names, then the code name.
    pub fn from_symbol(symbol: &str) -> Result<KeyEvent, Error> {
        let mut modifiers = KeyModifiers::empty();
        let mut rest = symbol;
        while let Some((head, tail)) = rest.split_once('_') {
            if tail.is_empty() {
                break;
            }
            match KeyModifiers::parse_name(head) {
                Some(m) if MODIFIER_NAMES.iter().any(|(n, _)| *n == head) => {
                    modifiers |= m;
                    rest = tail;
                }
                _ => break,
            }
        }
        let code = KeyCode::from_name(rest)
            .ok_or_else(|| Error::InvalidKey(format!("unknown key: {symbol}")))?;
        Ok(KeyEvent { code, modifiers })
    }

    /// Sorted modifier names joined with the code name: `ctrl_shift_c`.
    pub fn to_symbol(&self) -> String {
        let mut parts: Vec<String> = self
            .modifiers
            .names()
            .into_iter()
            .map(str::to_string)
            .collect();
        parts.push(self.code.name());
        parts.join("_")
    }

    pub fn is_text(&self) -> bool {
        matches!(self.code, KeyCode::Char(_))
    }

    pub fn char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        }
    }

    fn held(&self, modifier: KeyModifiers) -> bool {
        self.modifiers.contains(modifier)
            || matches!(self.code, KeyCode::Modifier(m) if m.modifier() == modifier)
    }

    pub fn ctrl(&self) -> bool {
        self.held(KeyModifiers::CTRL)
    }

    pub fn alt(&self) -> bool {
        self.held(KeyModifiers::ALT)
    }

    pub fn shift(&self) -> bool {
        self.held(KeyModifiers::SHIFT)
    }

    pub fn super_(&self) -> bool {
        self.held(KeyModifiers::SUPER)
    }

    pub fn hyper(&self) -> bool {
        self.held(KeyModifiers::HYPER)
    }

    pub fn meta(&self) -> bool {
        self.held(KeyModifiers::META)
    }

    /// Whether this key answers to `name`: an exact symbol, a modifier or
    /// kind predicate, or one of the lenient key aliases.
    pub fn matches(&self, name: &str) -> bool {
        let symbol = self.to_symbol();
        if symbol == name {
            return true;
        }

        match name {
            "ctrl" | "control" => return self.ctrl(),
            "alt" | "option" => return self.alt(),
            "shift" => return self.shift(),
            "super" | "win" | "command" | "cmd" | "tux" => return self.super_(),
            "hyper" => return self.hyper(),
            "meta" => return self.meta(),
            "text" => return self.is_text(),
            "standard" | "unmodified" => return self.kind() == KeyKind::Standard,
            "function" | "media" | "modifier" | "system" => return self.kind().name() == name,
            _ => {}
        }

        let code = self.code.name();
        if name == "reverse_tab" {
            if self.code == KeyCode::BackTab {
                return true;
            }
            if self.code == KeyCode::Tab && self.modifiers.contains(KeyModifiers::SHIFT) {
                return true;
            }
        }

        if let KeyCode::Media(media) = self.code {
            if code.strip_prefix("media_") == Some(name) {
                return true;
            }
            if media == MediaKeyCode::PlayPause && (name == "play" || name == "pause") {
                return true;
            }
            if name == "play_pause" && matches!(media, MediaKeyCode::Play | MediaKeyCode::Pause) {
                return true;
            }
        }

        if !self.modifiers.is_empty() {
            return false;
        }
        if let Some((_, target)) = KEY_ALIASES.iter().find(|(alias, _)| *alias == name) {
            if code == *target {
                return true;
            }
        }
        name.replace('_', "") == code.replace('_', "")
    }
}

impl fmt::Display for KeyEvent {
    /// Text keys render as their character; every other key renders empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            KeyCode::Char(c) => write!(f, "{c}"),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Mouse events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseEventKind {
    Down,
    Up,
    Drag,
    Moved,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
    pub button: MouseButton,
    pub modifiers: KeyModifiers,
}

impl MouseEvent {
    pub fn is_down(&self) -> bool {
        self.kind == MouseEventKind::Down
    }

    pub fn is_up(&self) -> bool {
        self.kind == MouseEventKind::Up
    }

    pub fn is_drag(&self) -> bool {
        self.kind == MouseEventKind::Drag
    }

    pub fn is_scroll_up(&self) -> bool {
        self.kind == MouseEventKind::ScrollUp
    }

    pub fn is_scroll_down(&self) -> bool {
        self.kind == MouseEventKind::ScrollDown
    }
}

// ============================================================================
// Event
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "EventRepr", into = "EventRepr")]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
    Paste { content: String },
    FocusGained,
    FocusLost,
    /// No input was available.
    None,
}

impl Default for Event {
    fn default() -> Self {
        Event::None
    }
}

impl Event {
    /// Build a key event from symbol form, e.g. `"ctrl_c"` or `"enter"`.
    pub fn key(symbol: &str) -> Result<Event, Error> {
        KeyEvent::from_symbol(symbol).map(Event::Key)
    }

    pub fn is_key(&self) -> bool {
        matches!(self, Event::Key(_))
    }

    pub fn is_mouse(&self) -> bool {
        matches!(self, Event::Mouse(_))
    }

    pub fn is_resize(&self) -> bool {
        matches!(self, Event::Resize { .. })
    }

    pub fn is_paste(&self) -> bool {
        matches!(self, Event::Paste { .. })
    }

    pub fn is_focus_gained(&self) -> bool {
        matches!(self, Event::FocusGained)
    }

    pub fn is_focus_lost(&self) -> bool {
        matches!(self, Event::FocusLost)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Event::None)
    }

    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Event::Key(k) => Some(k),
            _ => None,
        }
    }

    /// Key events answer through `KeyEvent::matches`; nothing else matches.
    pub fn matches(&self, name: &str) -> bool {
        self.as_key().is_some_and(|k| k.matches(name))
    }
}

impl From<KeyEvent> for Event {
    fn from(key: KeyEvent) -> Self {
        Event::Key(key)
    }
}

impl From<MouseEvent> for Event {
    fn from(mouse: MouseEvent) -> Self {
        Event::Mouse(mouse)
    }
}

/// Wire shape of an event: the pattern-matching view the host binding sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EventRepr {
    Key {
        code: String,
        #[serde(default)]
        modifiers: Vec<String>,
        #[serde(default, skip_deserializing)]
        kind: Option<KeyKind>,
    },
    Mouse {
        kind: MouseEventKind,
        x: u16,
        y: u16,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        modifiers: Vec<String>,
    },
    Resize {
        width: u16,
        height: u16,
    },
    Paste {
        content: String,
    },
    FocusGained,
    FocusLost,
    None,
}

impl TryFrom<EventRepr> for Event {
    type Error = Error;

    fn try_from(repr: EventRepr) -> Result<Self, Self::Error> {
        Ok(match repr {
            EventRepr::Key {
                code, modifiers, ..
            } => {
                let code = KeyCode::from_name(&code)
                    .ok_or_else(|| Error::InvalidKey(format!("unknown key: {code}")))?;
                Event::Key(KeyEvent {
                    code,
                    modifiers: KeyModifiers::from_names(&modifiers)?,
                })
            }
            EventRepr::Mouse {
                kind,
                x,
                y,
                button,
                modifiers,
            } => Event::Mouse(MouseEvent {
                kind,
                x,
                y,
                button,
                modifiers: KeyModifiers::from_names(&modifiers)?,
            }),
            EventRepr::Resize { width, height } => Event::Resize { width, height },
            EventRepr::Paste { content } => Event::Paste { content },
            EventRepr::FocusGained => Event::FocusGained,
            EventRepr::FocusLost => Event::FocusLost,
            EventRepr::None => Event::None,
        })
    }
}

impl From<Event> for EventRepr {
    fn from(event: Event) -> Self {
        let names = |m: KeyModifiers| m.names().into_iter().map(str::to_string).collect();
        match event {
            Event::Key(k) => EventRepr::Key {
                code: k.code.name(),
                modifiers: names(k.modifiers),
                kind: Some(k.kind()),
            },
            Event::Mouse(m) => EventRepr::Mouse {
                kind: m.kind,
                x: m.x,
                y: m.y,
                button: m.button,
                modifiers: names(m.modifiers),
            },
            Event::Resize { width, height } => EventRepr::Resize { width, height },
            Event::Paste { content } => EventRepr::Paste { content },
            Event::FocusGained => EventRepr::FocusGained,
            Event::FocusLost => EventRepr::FocusLost,
            Event::None => EventRepr::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(symbol: &str) -> KeyEvent {
        KeyEvent::from_symbol(symbol).unwrap()
    }

    #[test]
    fn test_symbol_round_trip_order_independent() {
        let a = KeyEvent::new(KeyCode::Char('c'))
            .with_modifiers(KeyModifiers::SHIFT | KeyModifiers::CTRL);
        assert_eq!(a.to_symbol(), "ctrl_shift_c");
        assert_eq!(key("shift_ctrl_c"), a);
        assert_eq!(key("ctrl_shift_c"), a);
    }

    #[test]
    fn test_from_symbol_named_codes() {
        assert_eq!(key("page_up").code, KeyCode::PageUp);
        assert_eq!(key("alt_f4"), KeyEvent::new(KeyCode::F(4)).with_modifiers(KeyModifiers::ALT));
        assert_eq!(key("left_shift").code, KeyCode::Modifier(ModifierKeyCode::LeftShift));
        assert_eq!(key("ctrl__").code, KeyCode::Char('_'));
        assert!(KeyEvent::from_symbol("ctrl_nonsense").is_err());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(key("a").kind(), KeyKind::Standard);
        assert_eq!(key("up").kind(), KeyKind::Standard);
        assert_eq!(key("f5").kind(), KeyKind::Function);
        assert_eq!(key("esc").kind(), KeyKind::System);
        assert_eq!(key("pause").kind(), KeyKind::System);
        assert_eq!(key("media_pause").kind(), KeyKind::Media);
        assert_eq!(key("right_alt").kind(), KeyKind::Modifier);
    }

    #[test]
    fn test_system_pause_and_media_pause_are_distinct() {
        let system = key("pause");
        let media = key("media_pause");
        assert_ne!(system, media);
        assert!(system.matches("pause"));
        assert!(media.matches("pause"));
        assert!(!system.matches("media_pause"));
    }

    #[test]
    fn test_text_and_display() {
        assert!(key("a").is_text());
        assert_eq!(key("a").to_string(), "a");
        assert!(!key("enter").is_text());
        assert_eq!(key("enter").to_string(), "");
    }

    #[test]
    fn test_modifier_predicates_include_modifier_keys() {
        assert!(key("ctrl_c").ctrl());
        assert!(key("left_control").ctrl());
        assert!(!key("c").ctrl());
        assert!(key("super_a").matches("cmd"));
        assert!(key("right_meta").meta());
    }

    #[test]
    fn test_matches_aliases_and_underscores() {
        assert!(key("enter").matches("return"));
        assert!(key("page_up").matches("pgup"));
        assert!(key("page_up").matches("pageup"));
        assert!(key("backspace").matches("back"));
        assert!(key("print_screen").matches("prtsc"));
        assert!(!key("ctrl_enter").matches("return"));
        assert!(key("ctrl_enter").matches("ctrl_enter"));
    }

    #[test]
    fn test_matches_reverse_tab() {
        assert!(key("back_tab").matches("reverse_tab"));
        assert!(key("shift_tab").matches("reverse_tab"));
        assert!(!key("tab").matches("reverse_tab"));
    }

    #[test]
    fn test_matches_media_play_pause() {
        assert!(key("media_play_pause").matches("play"));
        assert!(key("media_play_pause").matches("pause"));
        assert!(key("media_play").matches("play_pause"));
        assert!(key("media_stop").matches("stop"));
        assert!(!key("media_stop").matches("play"));
    }

    #[test]
    fn test_none_predicates() {
        let e = Event::None;
        assert!(e.is_none());
        assert!(!e.is_key());
        assert!(!e.is_mouse());
        assert!(!e.is_resize());
        assert!(!e.is_paste());
        assert!(!e.is_focus_gained());
        assert!(!e.is_focus_lost());
        assert!(!e.matches("q"));
    }

    #[test]
    fn test_key_json_shape() {
        let e = Event::key("ctrl_shift_c").unwrap();
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "key",
                "code": "c",
                "modifiers": ["ctrl", "shift"],
                "kind": "standard"
            })
        );
        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn test_mouse_json_defaults() {
        let e: Event =
            serde_json::from_str(r#"{"type":"mouse","kind":"scroll_up","x":3,"y":4}"#).unwrap();
        match e {
            Event::Mouse(m) => {
                assert!(m.is_scroll_up());
                assert_eq!(m.button, MouseButton::None);
                assert_eq!((m.x, m.y), (3, 4));
            }
            other => panic!("expected mouse, got {other:?}"),
        }
    }

    #[test]
    fn test_unit_events_json() {
        let e: Event = serde_json::from_str(r#"{"type":"focus_lost"}"#).unwrap();
        assert!(e.is_focus_lost());
        assert_eq!(
            serde_json::to_string(&Event::None).unwrap(),
            r#"{"type":"none"}"#
        );
        let e: Event = serde_json::from_str(r#"{"type":"paste","content":"hi"}"#).unwrap();
        assert_eq!(e, Event::Paste { content: "hi".into() });
    }

    #[test]
    fn test_unknown_key_json_is_error() {
        assert!(serde_json::from_str::<Event>(r#"{"type":"key","code":"warp"}"#).is_err());
    }

    #[test]
    fn test_modifier_aliases_alongside_flag_names() {
        assert_eq!(KeyModifiers::parse_name("cmd"), Some(KeyModifiers::SUPER));
        assert_eq!(KeyModifiers::parse_name("control"), Some(KeyModifiers::CTRL));
        assert_eq!(KeyModifiers::parse_name("CTRL"), None);
        assert_eq!(KeyModifiers::from_name("CTRL"), Some(KeyModifiers::CTRL));
    }
}
