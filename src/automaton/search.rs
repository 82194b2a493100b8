//! Streaming Aho-Corasick search.
//!
//! A [`SearchCursor`] scans a borrowed input left to right, one
//! [`InputUnit`] at a time. After each unit it reports every pattern that
//! ends there: first the one reached along trie edges, then each shorter
//! one found on the fail chain. Like [`ItemsCursor`](super::items::ItemsCursor)
//! it keeps no borrow of the automaton between calls and fails with
//! [`AutomatonError::StaleIterator`] once the automaton has changed.
//!
//! ```
//! use libahocorasick::{Automaton, Value};
//!
//! let mut automaton = Automaton::new();
//! for (word, value) in [("he", 1), ("she", 2), ("his", 3), ("hers", 4)] {
//!     automaton.add_word(word, value).unwrap();
//! }
//! automaton.make_automaton();
//!
//! let found: Vec<(usize, i32)> = automaton
//!     .iter_str("ushers")
//!     .unwrap()
//!     .map(|m| {
//!         let m = m.unwrap();
//!         match m.value {
//!             Value::Object(v) => (m.end, *v),
//!             Value::Integer(_) => unreachable!(),
//!         }
//!     })
//!     .collect();
//! assert_eq!(found, [(4, 2), (4, 1), (6, 4)]);
//! ```

use std::ops::Range;

use tracing::debug;

use super::children::Value;
use super::error::{AutomatonError, Result};
use super::node_arena::NodeId;
use super::owned::{Automaton, AutomatonKind};
use super::unit_trait::InputUnit;

/// A pattern occurrence found by a search.
#[derive(Debug, PartialEq, Eq)]
pub struct Match<'a, V> {
    /// Index, in input units, just past the last unit of the occurrence.
    pub end: usize,
    /// The value stored for the pattern.
    pub value: Value<'a, V>,
}

impl<V> Clone for Match<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Match<'_, V> {}

/// A resumable scan of `input[start..end]` against an automaton.
#[derive(Debug)]
pub struct SearchCursor<'t, U: InputUnit = u8> {
    automaton_id: u64,
    version: u64,
    input: &'t [U],
    state: NodeId,
    output: Option<NodeId>,
    position: usize,
    end: usize,
    failed: Option<AutomatonError>,
}

impl<'t, U: InputUnit> SearchCursor<'t, U> {
    /// Creates a cursor scanning `input[range]`.
    ///
    /// # Errors
    ///
    /// - [`AutomatonError::NotAhoCorasick`] if keys were added or removed
    ///   since the fail links were last built
    /// - [`AutomatonError::InvalidRange`] if `range` does not lie within `input`
    pub fn new<V>(automaton: &Automaton<V>, input: &'t [U], range: Range<usize>) -> Result<Self> {
        // An empty automaton is only a root and needs no links.
        if automaton.kind() == AutomatonKind::Trie {
            return Err(AutomatonError::NotAhoCorasick);
        }
        if range.start > range.end || range.end > input.len() {
            return Err(AutomatonError::InvalidRange {
                start: range.start,
                end: range.end,
                len: input.len(),
            });
        }
        Ok(SearchCursor {
            automaton_id: automaton.id(),
            version: automaton.version(),
            input,
            state: automaton.root(),
            output: None,
            position: range.start,
            end: range.end,
            failed: None,
        })
    }

    /// Number of input units consumed so far, counted from the start of
    /// the input rather than of the range.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The automaton node the scan is at.
    pub fn state(&self) -> NodeId {
        self.state
    }

    /// Produces the next match, or `Ok(None)` once the range is scanned.
    ///
    /// # Errors
    ///
    /// - [`AutomatonError::ForeignAutomaton`] if `automaton` is not the
    ///   one this cursor was created for
    /// - [`AutomatonError::StaleIterator`] if `automaton` was mutated
    ///   after this cursor was created
    /// - [`AutomatonError::InternalConsistency`] if the automaton's links
    ///   are broken
    ///
    /// After an error every further call returns the same error.
    pub fn advance<'a, V>(&mut self, automaton: &'a Automaton<V>) -> Result<Option<Match<'a, V>>> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        let result = self.step(automaton);
        if let Err(err) = &result {
            self.failed = Some(err.clone());
        }
        result
    }

    fn step<'a, V>(&mut self, automaton: &'a Automaton<V>) -> Result<Option<Match<'a, V>>> {
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
                "search cursor is stale"
            );
            return Err(AutomatonError::StaleIterator);
        }

        loop {
            if let Some(id) = self.output {
                let node = automaton.node(id);
                let payload = node.payload().ok_or(AutomatonError::InternalConsistency(
                    "output link to a non-terminal node",
                ))?;
                let value = payload.value(automaton.store_kind())?;
                self.output = node.fail().and_then(|fail| automaton.node(fail).output());
                return Ok(Some(Match {
                    end: self.position,
                    value,
                }));
            }

            if self.position >= self.end {
                return Ok(None);
            }
            let unit = self.input[self.position];
            for byte in unit.to_bytes() {
                self.state = automaton.transition(self.state, byte)?;
            }
            self.position += 1;
            self.output = automaton.node(self.state).output();
        }
    }
}

/// An [`Iterator`] over the matches of a search.
///
/// Created by [`Automaton::iter`] and its variants. Stops after the first
/// error.
pub struct SearchIter<'a, 't, V, U: InputUnit = u8> {
    automaton: &'a Automaton<V>,
    cursor: SearchCursor<'t, U>,
    done: bool,
}

impl<'a, 't, V, U: InputUnit> SearchIter<'a, 't, V, U> {
    /// Creates an iterator over the matches in `input[range]`.
    ///
    /// # Errors
    ///
    /// Same as [`SearchCursor::new`].
    pub fn new(automaton: &'a Automaton<V>, input: &'t [U], range: Range<usize>) -> Result<Self> {
        Ok(SearchIter {
            automaton,
            cursor: SearchCursor::new(automaton, input, range)?,
            done: false,
        })
    }
}

impl<'a, V, U: InputUnit> Iterator for SearchIter<'a, '_, V, U> {
    type Item = Result<Match<'a, V>>;

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

impl<V, U: InputUnit> std::iter::FusedIterator for SearchIter<'_, '_, V, U> {}

impl<V> Automaton<V> {
    /// Searches the whole of `input`.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::NotAhoCorasick`] if the automaton holds
    /// keys and [`make_automaton`](Automaton::make_automaton) was not
    /// called after the last mutation. An empty automaton searches fine
    /// and finds nothing.
    pub fn iter<'t, U: InputUnit>(&self, input: &'t [U]) -> Result<SearchIter<'_, 't, V, U>> {
        SearchIter::new(self, input, 0..input.len())
    }

    /// Searches `input[range]`. Match positions are still counted from the
    /// start of `input`.
    ///
    /// # Errors
    ///
    /// Same as [`SearchCursor::new`].
    pub fn iter_range<'t, U: InputUnit>(
        &self,
        input: &'t [U],
        range: Range<usize>,
    ) -> Result<SearchIter<'_, 't, V, U>> {
        SearchIter::new(self, input, range)
    }

    /// Searches the UTF-8 bytes of `text`. Match positions are byte offsets.
    ///
    /// # Errors
    ///
    /// Same as [`Automaton::iter`].
    pub fn iter_str<'t>(&self, text: &'t str) -> Result<SearchIter<'_, 't, V, u8>> {
        self.iter(text.as_bytes())
    }

    /// Collects every match in `input`.
    ///
    /// # Errors
    ///
    /// Same as [`Automaton::iter`], plus any error met during the scan.
    pub fn find_all<U: InputUnit>(&self, input: &[U]) -> Result<Vec<Match<'_, V>>> {
        self.iter(input)?.collect()
    }
}
