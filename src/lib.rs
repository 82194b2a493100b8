//! # libahocorasick
//!
//! A multi-pattern string matcher built on an
//! [Aho-Corasick](https://en.wikipedia.org/wiki/Aho%E2%80%93Corasick_algorithm)
//! automaton: a trie of byte keys augmented with fail links, so that one
//! left-to-right pass over a text finds every occurrence of every key.
//!
//! ## Features
//!
//! - **Resumable traversals**: enumeration and search are cursors that can
//!   be paused after any result and resumed later
//! - **Stale detection**: every mutation bumps the automaton's version, and a
//!   cursor created before the mutation refuses to continue
//! - **Store kinds**: keep an arbitrary value per key, an integer, or the key
//!   length ([`StoreKind`])
//! - **Wide input units**: scan `u8`, `u16`, `u32` or `char` text; wide units
//!   are fed to the automaton as one to four bytes ([`InputUnit`])
//!
//! ## Quick Start
//!
//! ```
//! use libahocorasick::{Automaton, Value};
//!
//! let mut automaton = Automaton::new();
//! automaton.add_word("he", "he").unwrap();
//! automaton.add_word("she", "she").unwrap();
//! automaton.add_word("hers", "hers").unwrap();
//! automaton.make_automaton();
//!
//! for m in automaton.iter_str("ushers").unwrap() {
//!     let m = m.unwrap();
//!     if let Value::Object(word) = m.value {
//!         println!("{word} ends at {}", m.end);
//!     }
//! }
//! ```
//!
//! ## Cursors
//!
//! The cursor types hold no borrow of the automaton, which is passed to each
//! [`advance`](ItemsCursor::advance) call instead. That lets a caller keep a
//! cursor across mutations and get a
//! [`StaleIterator`](AutomatonError::StaleIterator) error rather than
//! results from a graph that has changed underneath it:
//!
//! ```
//! use libahocorasick::{Automaton, AutomatonError, ItemsCursor, IterMode};
//!
//! let mut automaton = Automaton::new();
//! automaton.add_word("CAKE", 1).unwrap();
//!
//! let mut cursor = ItemsCursor::new(&automaton, IterMode::Keys);
//! automaton.add_word("BAKE", 2).unwrap();
//! assert_eq!(cursor.advance(&automaton), Err(AutomatonError::StaleIterator));
//! ```

#![warn(missing_docs)]

/// Core automaton data structure: nodes, mutation, enumeration and search.
pub mod automaton;

pub use automaton::{
    Automaton, AutomatonError, AutomatonKind, Entry, InputUnit, IntoKey, ItemsCursor, ItemsIter,
    IterMode, Match, NodeId, Payload, Result, SearchCursor, SearchIter, Stats, StoreKind, Value,
};
