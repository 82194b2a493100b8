use std::sync::atomic::{AtomicU64, Ordering};

use itertools::{Itertools, Position};
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::builder::{build_fail_links, IntoKey};
use super::children::{Payload, StoreKind, TrieNode, Value};
use super::error::{AutomatonError, Result};
use super::node_arena::{NodeArena, NodeId};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// How far construction of an automaton has progressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AutomatonKind {
    /// No keys are stored.
    Empty,
    /// Keys are stored but the fail links are missing or out of date.
    Trie,
    /// Fail links are built; the automaton can search.
    AhoCorasick,
}

/// Summary of an automaton's shape, see [`Automaton::stats`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Stats {
    /// Number of trie nodes, root included.
    pub nodes_count: usize,
    /// Number of stored keys.
    pub words_count: usize,
    /// Length in bytes of the longest stored key.
    pub longest_word: usize,
    /// Number of trie edges.
    pub links_count: usize,
}

/// An Aho-Corasick automaton: a trie of byte keys with fail links.
///
/// Keys are added with the insertion method of the automaton's
/// [`StoreKind`], then [`make_automaton`](Automaton::make_automaton) builds
/// the fail links that searching needs. Every mutation bumps the
/// automaton's [`version`](Automaton::version), which the cursors use to
/// notice that they have gone stale.
///
/// # Examples
///
/// ```
/// use libahocorasick::Automaton;
///
/// let mut automaton = Automaton::new();
/// automaton.add_word("he", 1).unwrap();
/// automaton.add_word("she", 2).unwrap();
/// automaton.make_automaton();
///
/// let ends: Vec<usize> = automaton
///     .iter(b"ushers")
///     .unwrap()
///     .map(|m| m.unwrap().end)
///     .collect();
/// assert_eq!(ends, [4, 4]);
/// ```
pub struct Automaton<V = ()> {
    id: u64,
    arena: NodeArena<V>,
    store: StoreKind,
    kind: AutomatonKind,
    version: u64,
    count: usize,
}

impl<V> Default for Automaton<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Automaton<V> {
    /// Creates an empty automaton storing one arbitrary value per key.
    pub fn new() -> Self {
        Self::with_store(StoreKind::Any)
    }

    /// Creates an empty automaton with the given store kind.
    pub fn with_store(store: StoreKind) -> Self {
        Automaton {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            arena: NodeArena::new(),
            store,
            kind: AutomatonKind::Empty,
            version: 0,
            count: 0,
        }
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this automaton.
    #[inline]
    pub fn node(&self, id: NodeId) -> &TrieNode<V> {
        self.arena.node(id)
    }

    /// Returns an identifier unique to this automaton within the process.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the current version. It increases on every mutation.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns what terminal nodes hold.
    #[inline]
    pub fn store_kind(&self) -> StoreKind {
        self.store
    }

    /// Returns how far construction has progressed.
    #[inline]
    pub fn kind(&self) -> AutomatonKind {
        self.kind
    }

    /// Returns the number of stored keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// True if no keys are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Adds a key with an arbitrary value.
    ///
    /// Returns `true` if the key is new and `false` if it was already
    /// present, in which case its value is replaced. Empty keys are
    /// ignored and return `false`.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::StoreMismatch`] unless the store kind is
    /// [`StoreKind::Any`].
    pub fn add_word(&mut self, key: impl IntoKey, value: V) -> Result<bool> {
        self.check_store(StoreKind::Any)?;
        Ok(self.insert(&key.collect_key(), Payload::Object(value)))
    }

    /// Adds a key with an integer value.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::StoreMismatch`] unless the store kind is
    /// [`StoreKind::Integer`].
    pub fn add_integer(&mut self, key: impl IntoKey, value: i64) -> Result<bool> {
        self.check_store(StoreKind::Integer)?;
        Ok(self.insert(&key.collect_key(), Payload::Integer(value)))
    }

    /// Adds a key whose value is its own length in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::StoreMismatch`] unless the store kind is
    /// [`StoreKind::Length`].
    pub fn add_key(&mut self, key: impl IntoKey) -> Result<bool> {
        self.check_store(StoreKind::Length)?;
        let key = key.collect_key();
        let len = i64::try_from(key.len()).unwrap_or(i64::MAX);
        Ok(self.insert(&key, Payload::Integer(len)))
    }

    fn check_store(&self, found: StoreKind) -> Result<()> {
        if self.store == found {
            Ok(())
        } else {
            Err(AutomatonError::StoreMismatch {
                expected: self.store,
                found,
            })
        }
    }

    fn insert(&mut self, key: &[u8], payload: Payload<V>) -> bool {
        if key.is_empty() {
            return false;
        }

        let mut payload = Some(payload);
        let mut node = NodeId::ROOT;
        let mut is_new = false;
        for (position, &byte) in key.iter().with_position() {
            node = self.child_or_insert(node, byte);
            if let Position::Last | Position::Only = position {
                let slot = &mut self.arena.node_mut(node).payload;
                is_new = slot.is_none();
                *slot = payload.take();
            }
        }

        if is_new {
            self.count += 1;
        }
        self.kind = AutomatonKind::Trie;
        self.version += 1;
        trace!(key_len = key.len(), is_new, version = self.version, "key added");
        is_new
    }

    fn child_or_insert(&mut self, parent: NodeId, byte: u8) -> NodeId {
        if let Some(child) = self.arena.node(parent).get(byte) {
            return child;
        }
        let child = self.arena.alloc(TrieNode::new(byte));
        self.arena.node_mut(parent).children_mut().insert(byte, child);
        child
    }

    /// Removes a key, returning its payload if it was present.
    ///
    /// Nodes left without children or a payload are released for reuse.
    pub fn pop(&mut self, key: impl IntoKey) -> Option<Payload<V>> {
        let key = key.collect_key();
        if key.is_empty() {
            return None;
        }

        let mut path: SmallVec<[NodeId; 32]> = SmallVec::with_capacity(key.len() + 1);
        path.push(NodeId::ROOT);
        let mut node = NodeId::ROOT;
        for &byte in key.iter() {
            node = self.arena.node(node).get(byte)?;
            path.push(node);
        }
        let payload = self.arena.node_mut(node).payload.take()?;

        for level in (1..path.len()).rev() {
            let id = path[level];
            let current = self.arena.node(id);
            if current.is_terminal() || !current.children().is_empty() {
                break;
            }
            self.arena
                .node_mut(path[level - 1])
                .children_mut()
                .remove(key[level - 1]);
            self.arena.release(id);
        }

        self.count -= 1;
        self.kind = if self.count == 0 {
            AutomatonKind::Empty
        } else {
            AutomatonKind::Trie
        };
        self.version += 1;
        trace!(key_len = key.len(), version = self.version, "key removed");
        Some(payload)
    }

    /// Removes a key. Returns `true` if it was present.
    pub fn remove_word(&mut self, key: impl IntoKey) -> bool {
        self.pop(key).is_some()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.arena = NodeArena::new();
        self.count = 0;
        self.kind = AutomatonKind::Empty;
        self.version += 1;
        debug!(version = self.version, "automaton cleared");
    }

    /// Builds the fail links, turning the trie into an Aho-Corasick
    /// automaton. Does nothing on an empty automaton.
    pub fn make_automaton(&mut self) {
        if self.kind == AutomatonKind::Empty {
            return;
        }
        let linked = build_fail_links(&mut self.arena);
        self.kind = AutomatonKind::AhoCorasick;
        self.version += 1;
        debug!(
            nodes = linked + 1,
            words = self.count,
            version = self.version,
            "fail links built"
        );
    }

    /// Returns the node reached by following `key` from the root.
    pub fn lookup(&self, key: impl IntoKey) -> Option<NodeId> {
        key.collect_key()
            .iter()
            .try_fold(NodeId::ROOT, |node, &byte| self.arena.node(node).get(byte))
    }

    /// True if the key is stored.
    pub fn exists(&self, key: impl IntoKey) -> bool {
        self.lookup(key)
            .is_some_and(|node| self.arena.node(node).is_terminal())
    }

    /// Returns the value stored for a key.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::InternalConsistency`] if the stored
    /// payload does not match the store kind.
    pub fn get(&self, key: impl IntoKey) -> Result<Option<Value<'_, V>>> {
        match self.lookup(key).and_then(|node| self.arena.node(node).payload()) {
            Some(payload) => payload.value(self.store).map(Some),
            None => Ok(None),
        }
    }

    /// True if some stored key starts with `prefix`.
    pub fn match_prefix(&self, prefix: impl IntoKey) -> bool {
        self.lookup(prefix).is_some()
    }

    /// Returns the length of the longest prefix of `text` that is a path
    /// in the trie, whether or not it spells a stored key.
    pub fn longest_prefix(&self, text: impl IntoKey) -> usize {
        let mut node = NodeId::ROOT;
        let mut len = 0;
        for &byte in text.collect_key().iter() {
            match self.arena.node(node).get(byte) {
                Some(child) => node = child,
                None => break,
            }
            len += 1;
        }
        len
    }

    /// The transition function of the automaton.
    ///
    /// Follows the edge labelled `byte` from `cursor` if there is one,
    /// otherwise the fail links outward until a node with such an edge is
    /// found. A root without the edge stays at the root.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::InternalConsistency`] if a non-root node
    /// without a fail link is met, which happens when the fail links have
    /// not been built.
    #[inline]
    pub fn transition(&self, cursor: NodeId, byte: u8) -> Result<NodeId> {
        let mut current = cursor;
        loop {
            let node = self.arena.node(current);
            if let Some(next) = node.get(byte) {
                return Ok(next);
            }
            if current == NodeId::ROOT {
                return Ok(NodeId::ROOT);
            }
            current = node
                .fail()
                .ok_or(AutomatonError::InternalConsistency("node without a fail link"))?;
        }
    }

    /// Collects statistics about the trie.
    pub fn stats(&self) -> Stats {
        let mut stats = Stats {
            words_count: self.count,
            ..Stats::default()
        };
        let mut stack = vec![(NodeId::ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.arena.node(id);
            stats.nodes_count += 1;
            stats.links_count += node.children().len();
            if node.is_terminal() {
                stats.longest_word = stats.longest_word.max(depth);
            }
            stack.extend(node.children().iter().map(|(_, child)| (child, depth + 1)));
        }
        debug_assert_eq!(stats.nodes_count, self.arena.len());
        stats
    }
}

impl<V> std::fmt::Debug for Automaton<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automaton")
            .field("id", &self.id)
            .field("store", &self.store)
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("len", &self.count)
            .field("node_count", &self.arena.len())
            .finish()
    }
}
