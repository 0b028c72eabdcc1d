//! State Module — external widget state and the handle store.
//!
//! Responsibilities:
//! - `ListState`, `TableState`, `ScrollbarState` owned by the application
//!   and mutated by stateful rendering (offset write-back)
//! - `StateStore`: u32 handles for states held on behalf of the C ABI

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListState {
    pub selected: Option<usize>,
    pub offset: usize,
}

impl ListState {
    pub fn with_selected(selected: Option<usize>) -> Self {
        Self {
            selected,
            offset: 0,
        }
    }

    /// Deselecting also resets the offset.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
        if index.is_none() {
            self.offset = 0;
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn select_next(&mut self) {
        let next = self.selected.map_or(0, |i| i.saturating_add(1));
        self.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        let prev = self.selected.map_or(usize::MAX, |i| i.saturating_sub(1));
        self.select(Some(prev));
    }

    pub fn scroll_down_by(&mut self, amount: u16) {
        let current = self.selected.unwrap_or_default();
        self.select(Some(current.saturating_add(amount as usize)));
    }

    pub fn scroll_up_by(&mut self, amount: u16) {
        let current = self.selected.unwrap_or_default();
        self.select(Some(current.saturating_sub(amount as usize)));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableState {
    pub selected: Option<usize>,
    pub selected_column: Option<usize>,
    pub offset: usize,
}

impl TableState {
    pub fn with_selected(selected: Option<usize>) -> Self {
        Self {
            selected,
            ..Self::default()
        }
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
        if index.is_none() {
            self.offset = 0;
        }
    }

    pub fn select_column(&mut self, index: Option<usize>) {
        self.selected_column = index;
    }

    pub fn scroll_down_by(&mut self, amount: u16) {
        let current = self.selected.unwrap_or_default();
        self.select(Some(current.saturating_add(amount as usize)));
    }

    pub fn scroll_up_by(&mut self, amount: u16) {
        let current = self.selected.unwrap_or_default();
        self.select(Some(current.saturating_sub(amount as usize)));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarState {
    pub content_length: usize,
    pub position: usize,
    pub viewport_content_length: usize,
}

impl ScrollbarState {
    pub fn new(content_length: usize) -> Self {
        Self {
            content_length,
            ..Self::default()
        }
    }

    pub fn position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn first(&mut self) {
        self.position = 0;
    }

    pub fn last(&mut self) {
        self.position = self.content_length.saturating_sub(1);
    }

    pub fn next(&mut self) {
        self.position = self
            .position
            .saturating_add(1)
            .min(self.content_length.saturating_sub(1));
    }

    pub fn prev(&mut self) {
        self.position = self.position.saturating_sub(1);
    }
}

// ============================================================================
// State store
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    List,
    Table,
    Scrollbar,
}

/// A state held in a `StateStore`. JSON is tagged by `"kind"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetState {
    List(ListState),
    Table(TableState),
    Scrollbar(ScrollbarState),
}

impl WidgetState {
    pub fn new(kind: StateKind) -> Self {
        match kind {
            StateKind::List => WidgetState::List(ListState::default()),
            StateKind::Table => WidgetState::Table(TableState::default()),
            StateKind::Scrollbar => WidgetState::Scrollbar(ScrollbarState::default()),
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            WidgetState::List(_) => StateKind::List,
            WidgetState::Table(_) => StateKind::Table,
            WidgetState::Scrollbar(_) => StateKind::Scrollbar,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WidgetState::List(_) => "ListState",
            WidgetState::Table(_) => "TableState",
            WidgetState::Scrollbar(_) => "ScrollbarState",
        }
    }
}

/// Handle map for widget states. Handle 0 is never issued and handles are
/// never reused after `remove`.
#[derive(Debug)]
pub struct StateStore {
    states: HashMap<u32, WidgetState>,
    next_handle: u32,
}

impl Default for StateStore {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            next_handle: 1,
        }
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: WidgetState) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.states.insert(handle, state);
        handle
    }

    pub fn create(&mut self, kind: StateKind) -> u32 {
        self.insert(WidgetState::new(kind))
    }

    pub fn get(&self, handle: u32) -> Result<&WidgetState> {
        self.states.get(&handle).ok_or(Error::InvalidHandle(handle))
    }

    pub fn get_mut(&mut self, handle: u32) -> Result<&mut WidgetState> {
        self.states
            .get_mut(&handle)
            .ok_or(Error::InvalidHandle(handle))
    }

    /// Replace the state under `handle`; the kind must not change.
    pub fn set(&mut self, handle: u32, state: WidgetState) -> Result<()> {
        let slot = self.get_mut(handle)?;
        if slot.kind() != state.kind() {
            return Err(Error::Other(format!(
                "state {handle} is a {}, not a {}",
                slot.name(),
                state.name()
            )));
        }
        *slot = state;
        Ok(())
    }

    pub fn remove(&mut self, handle: u32) -> Result<WidgetState> {
        self.states
            .remove(&handle)
            .ok_or(Error::InvalidHandle(handle))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_select_none_resets_offset() {
        let mut s = ListState {
            selected: Some(5),
            offset: 3,
        };
        s.select(None);
        assert_eq!(s.offset(), 0);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn test_list_scroll_by() {
        let mut s = ListState::default();
        s.scroll_down_by(3);
        assert_eq!(s.selected, Some(3));
        s.scroll_up_by(10);
        assert_eq!(s.selected, Some(0));
        s.select_next();
        assert_eq!(s.selected, Some(1));
    }

    #[test]
    fn test_table_column_selection() {
        let mut s = TableState::with_selected(Some(1));
        s.select_column(Some(2));
        assert_eq!(s.selected, Some(1));
        assert_eq!(s.selected_column, Some(2));
    }

    #[test]
    fn test_scrollbar_navigation() {
        let mut s = ScrollbarState::new(3);
        s.next();
        s.next();
        s.next();
        assert_eq!(s.position, 2);
        s.prev();
        assert_eq!(s.position, 1);
        s.first();
        assert_eq!(s.position, 0);
        s.last();
        assert_eq!(s.position, 2);
    }

    #[test]
    fn test_scrollbar_empty_content_stays_at_zero() {
        let mut s = ScrollbarState::new(0);
        s.next();
        s.last();
        assert_eq!(s.position, 0);
    }

    #[test]
    fn test_handle_zero_invalid() {
        let store = StateStore::new();
        assert!(matches!(store.get(0), Err(Error::InvalidHandle(0))));
    }

    #[test]
    fn test_handles_not_recycled() {
        let mut store = StateStore::new();
        let a = store.create(StateKind::List);
        let b = store.create(StateKind::Table);
        assert_eq!((a, b), (1, 2));
        store.remove(a).unwrap();
        let c = store.create(StateKind::List);
        assert_eq!(c, 3);
        assert!(store.get(a).is_err());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_rejects_kind_change() {
        let mut store = StateStore::new();
        let h = store.create(StateKind::List);
        assert!(store
            .set(h, WidgetState::Table(TableState::default()))
            .is_err());
        store
            .set(h, WidgetState::List(ListState::with_selected(Some(2))))
            .unwrap();
        assert_eq!(
            store.get(h).unwrap(),
            &WidgetState::List(ListState::with_selected(Some(2)))
        );
    }

    #[test]
    fn test_state_json() {
        let s: WidgetState = serde_json::from_str(r#"{"kind":"list","selected":1}"#).unwrap();
        assert_eq!(s, WidgetState::List(ListState::with_selected(Some(1))));
    }
}
