// src/table/mod.rs
pub mod build;
pub mod fields;
pub mod io;
pub mod scanner;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

// Re-exports to keep the external API flat.
pub use io::{load_table_json_bytes, save_table_json, table_to_json};

/// Dense state index, assigned in first-seen order.
pub type StateId = usize;
/// Index into the caller-supplied action list.
pub type ActionId = usize;

/// Reserved name of a state that has no outgoing transitions.
pub const END: &str = "end";

/// One matchable unit of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Range {
    Byte(u8),
    /// Inclusive on both ends. `lo > hi` is accepted and matches nothing.
    Span(u8, u8),
}

impl Range {
    #[inline]
    pub fn matches(self, b: u8) -> bool {
        match self {
            Range::Byte(c) => c == b,
            Range::Span(lo, hi) => lo <= b && b <= hi,
        }
    }
}

/// Comma-separated alternatives; a byte matches if any range does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Key(pub Vec<Range>);

impl Key {
    #[inline]
    pub fn matches(&self, b: u8) -> bool {
        self.0.iter().any(|r| r.matches(b))
    }

    pub fn ranges(&self) -> &[Range] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    pub actions: Vec<ActionId>,
}

/// Key -> transition association, kept in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct State {
    edges: Vec<(Key, Transition)>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edge. An identical key replaces the earlier transition but
    /// keeps the earlier key's position in the match order.
    pub fn insert(&mut self, key: Key, transition: Transition) {
        match self.edges.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = transition,
            None => self.edges.push((key, transition)),
        }
    }

    /// First edge (in declaration order) whose key matches `b`.
    pub fn transition_for(&self, b: u8) -> Option<&Transition> {
        self.edges
            .iter()
            .find(|(k, _)| k.matches(b))
            .map(|(_, t)| t)
    }

    pub fn edges(&self) -> &[(Key, Transition)] {
        &self.edges
    }

    pub fn is_sink(&self) -> bool {
        self.edges.is_empty()
    }
}

/// State names mapped to dense indices.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    index: HashMap<String, StateId>,
    names: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next free index. Returns `None` if `name` is already taken.
    pub fn declare(&mut self, name: &str) -> Option<StateId> {
        if self.index.contains_key(name) {
            return None;
        }
        let id = self.names.len();
        self.index.insert(name.to_owned(), id);
        self.names.push(name.to_owned());
        Some(id)
    }

    pub fn get(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    pub fn name_of(&self, id: StateId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Compiled automaton. Immutable once built; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) symbols: SymbolTable,
    pub(crate) states: Vec<State>,
}

impl Table {
    pub const ENTRY: StateId = 0;

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.edges.len()).sum()
    }

    /// Display name for diagnostics; falls back to the raw index.
    pub fn state_name(&self, id: StateId) -> String {
        self.symbols
            .name_of(id)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("#{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(to: StateId, actions: &[ActionId]) -> Transition {
        Transition {
            from: 0,
            to,
            actions: actions.to_vec(),
        }
    }

    #[test]
    fn span_is_inclusive() {
        let r = Range::Span(b'a', b'z');
        assert!(r.matches(b'a'));
        assert!(r.matches(b'z'));
        assert!(!r.matches(b'`'));
        assert!(!r.matches(b'{'));
        assert!(!Range::Span(b'z', b'a').matches(b'm'));
    }

    #[test]
    fn first_declared_key_wins() {
        let mut s = State::new();
        s.insert(Key(vec![Range::Span(b'a', b'z')]), t(1, &[]));
        s.insert(Key(vec![Range::Byte(b'q')]), t(2, &[]));
        assert_eq!(s.transition_for(b'q').map(|t| t.to), Some(1));
    }

    #[test]
    fn duplicate_key_overwrites_in_place() {
        let mut s = State::new();
        let k = Key(vec![Range::Byte(b'x')]);
        s.insert(k.clone(), t(1, &[0]));
        s.insert(Key(vec![Range::Byte(b'y')]), t(2, &[]));
        s.insert(k, t(3, &[4, 5]));
        assert_eq!(s.edges().len(), 2);
        assert_eq!(s.edges()[0].1, t(3, &[4, 5]));
        assert_eq!(s.transition_for(b'x').map(|t| t.to), Some(3));
    }

    #[test]
    fn symbols_are_dense_and_unique() {
        let mut st = SymbolTable::new();
        assert_eq!(st.declare("start"), Some(0));
        assert_eq!(st.declare("mid"), Some(1));
        assert_eq!(st.declare("start"), None);
        assert_eq!(st.get("mid"), Some(1));
        assert_eq!(st.name_of(0), Some("start"));
        assert_eq!(st.get("nope"), None);
    }
}
