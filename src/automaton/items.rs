//! Depth-first enumeration of the keys and values stored in an automaton.
//!
//! [`ItemsCursor`] is the resumable traversal itself. It keeps no borrow of
//! the automaton between calls, so the automaton may be mutated while a
//! cursor is alive; the next [`advance`](ItemsCursor::advance) then fails
//! with [`AutomatonError::StaleIterator`]. [`ItemsIter`] wraps a cursor in
//! an [`Iterator`] that borrows the automaton for its whole lifetime.
//!
//! Siblings are visited in no particular order.
//!
//! ```
//! use libahocorasick::{Automaton, Entry};
//!
//! let mut automaton = Automaton::new();
//! automaton.add_word("BAKE", 1).unwrap();
//! automaton.add_word("CAKE", 2).unwrap();
//!
//! let mut keys: Vec<Vec<u8>> = automaton
//!     .keys()
//!     .map(|entry| entry.unwrap().into_key().unwrap())
//!     .collect();
//! keys.sort();
//! assert_eq!(keys, [b"BAKE".to_vec(), b"CAKE".to_vec()]);
//! ```

use tracing::debug;

use super::children::Value;
use super::error::{AutomatonError, Result};
use super::node_arena::NodeId;
use super::owned::Automaton;

/// Granularity of the key buffer. It starts at this size and grows in
/// multiples of it.
pub const SCRATCH_CHUNK: usize = 256;

/// What an enumeration produces for every stored key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IterMode {
    /// The key bytes.
    Keys,
    /// The stored value.
    Values,
    /// The key bytes together with the stored value.
    Items,
}

/// One result of an enumeration.
#[derive(Debug, PartialEq, Eq)]
pub enum Entry<'a, V> {
    /// A key, produced in [`IterMode::Keys`].
    Key(Vec<u8>),
    /// A value, produced in [`IterMode::Values`], and in
    /// [`IterMode::Items`] by automatons that store integers.
    Value(Value<'a, V>),
    /// A key and its value, produced in [`IterMode::Items`] by automatons
    /// that store arbitrary values.
    Item(Vec<u8>, &'a V),
}

impl<'a, V> Entry<'a, V> {
    /// The key bytes, if this entry carries them.
    pub fn key(&self) -> Option<&[u8]> {
        match self {
            Entry::Key(key) | Entry::Item(key, _) => Some(key),
            Entry::Value(_) => None,
        }
    }

    /// Takes the key bytes, if this entry carries them.
    pub fn into_key(self) -> Option<Vec<u8>> {
        match self {
            Entry::Key(key) | Entry::Item(key, _) => Some(key),
            Entry::Value(_) => None,
        }
    }

    /// The value, if this entry carries one.
    pub fn value(&self) -> Option<Value<'a, V>> {
        match self {
            Entry::Key(_) => None,
            Entry::Value(value) => Some(*value),
            Entry::Item(_, value) => Some(Value::Object(value)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    node: NodeId,
    depth: usize,
}

/// A resumable depth-first walk over the stored keys of one automaton.
///
/// Pending nodes live on an explicit stack, so the walk can stop after
/// any result and pick up again on the next call. The key of the node
/// being visited is rebuilt in a scratch buffer: a node at depth `d`
/// writes its incoming byte at offset `d`, and its key is `buffer[1..=d]`.
#[derive(Debug)]
pub struct ItemsCursor {
    automaton_id: u64,
    version: u64,
    mode: IterMode,
    stack: Vec<Frame>,
    buffer: Vec<u8>,
    failed: Option<AutomatonError>,
}

impl ItemsCursor {
    /// Creates a cursor over `automaton`'s current version.
    pub fn new<V>(automaton: &Automaton<V>, mode: IterMode) -> Self {
        ItemsCursor {
            automaton_id: automaton.id(),
            version: automaton.version(),
            mode,
            stack: vec![Frame {
                node: automaton.root(),
                depth: 0,
            }],
            buffer: vec![0; SCRATCH_CHUNK],
            failed: None,
        }
    }

    /// Returns what this cursor produces.
    pub fn mode(&self) -> IterMode {
        self.mode
    }

    /// Returns the current capacity of the key buffer.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Produces the next result, or `Ok(None)` once every key was visited.
    ///
    /// # Errors
    ///
    /// - [`AutomatonError::ForeignAutomaton`] if `automaton` is not the
    ///   one this cursor was created for
    /// - [`AutomatonError::StaleIterator`] if `automaton` was mutated
    ///   after this cursor was created
    /// - [`AutomatonError::OutOfMemory`] if the key buffer cannot grow
    /// - [`AutomatonError::InternalConsistency`] if a payload does not
    ///   match the store kind
    ///
    /// After an error every further call returns the same error.
    pub fn advance<'a, V>(&mut self, automaton: &'a Automaton<V>) -> Result<Option<Entry<'a, V>>> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        let result = self.step(automaton);
        if let Err(err) = &result {
            self.failed = Some(err.clone());
            self.stack = Vec::new();
        }
        result
    }

    fn step<'a, V>(&mut self, automaton: &'a Automaton<V>) -> Result<Option<Entry<'a, V>>> {
        if self.automaton_id != automaton.id() {
            return Err(AutomatonError::ForeignAutomaton {
                expected: self.automaton_id,
                found: automaton.id(),
            });
        }
        if self.version != automaton.version() {
            debug!(
                captured = self.version,
                current = automaton.version(),
                "enumeration cursor is stale"
            );
            return Err(AutomatonError::StaleIterator);
        }

        while let Some(Frame { node, depth }) = self.stack.pop() {
            let state = automaton.node(node);
            let children = state.children();
            self.stack
                .try_reserve(children.len())
                .map_err(|_| AutomatonError::OutOfMemory)?;
            self.stack.extend(children.iter().map(|(_, child)| Frame {
                node: child,
                depth: depth + 1,
            }));

            if self.mode != IterMode::Values {
                self.reserve_depth(depth)?;
                self.buffer[depth] = state.byte();
            }

            let Some(payload) = state.payload() else {
                continue;
            };
            let value = payload.value(automaton.store_kind())?;
            let entry = match (self.mode, value) {
                (IterMode::Keys, _) => Entry::Key(self.key(depth)),
                (IterMode::Values, value) => Entry::Value(value),
                (IterMode::Items, Value::Object(value)) => Entry::Item(self.key(depth), value),
                // Integer stores yield only the value, even for items.
                (IterMode::Items, value @ Value::Integer(_)) => Entry::Value(value),
            };
            return Ok(Some(entry));
        }
        Ok(None)
    }

    /// Makes room for a byte at offset `depth`.
    fn reserve_depth(&mut self, depth: usize) -> Result<()> {
        if depth < self.buffer.len() {
            return Ok(());
        }
        let new_len = SCRATCH_CHUNK * (depth / SCRATCH_CHUNK + 1);
        self.buffer
            .try_reserve_exact(new_len - self.buffer.len())
            .map_err(|_| AutomatonError::OutOfMemory)?;
        self.buffer.resize(new_len, 0);
        Ok(())
    }

    fn key(&self, depth: usize) -> Vec<u8> {
        self.buffer[1..=depth].to_vec()
    }
}

/// An [`Iterator`] over the stored keys, values or items of an automaton.
///
/// Created by [`Automaton::keys`], [`Automaton::values`] and
/// [`Automaton::items`]. Stops after the first error.
pub struct ItemsIter<'a, V> {
    automaton: &'a Automaton<V>,
    cursor: ItemsCursor,
    done: bool,
}

impl<'a, V> ItemsIter<'a, V> {
    /// Creates an iterator producing `mode` results.
    pub fn new(automaton: &'a Automaton<V>, mode: IterMode) -> Self {
        ItemsIter {
            automaton,
            cursor: ItemsCursor::new(automaton, mode),
            done: false,
        }
    }
}

impl<'a, V> Iterator for ItemsIter<'a, V> {
    type Item = Result<Entry<'a, V>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.cursor.advance(self.automaton).transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}

impl<V> std::iter::FusedIterator for ItemsIter<'_, V> {}

impl<V> Automaton<V> {
    /// Returns an iterator over the stored keys.
    pub fn keys(&self) -> ItemsIter<'_, V> {
        ItemsIter::new(self, IterMode::Keys)
    }

    /// Returns an iterator over the stored values.
    pub fn values(&self) -> ItemsIter<'_, V> {
        ItemsIter::new(self, IterMode::Values)
    }

    /// Returns an iterator over the stored keys and values.
    ///
    /// Automatons that store integers produce only the values, as
    /// [`Entry::Value`].
    pub fn items(&self) -> ItemsIter<'_, V> {
        ItemsIter::new(self, IterMode::Items)
    }
}
