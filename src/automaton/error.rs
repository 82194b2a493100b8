//! Error types for automaton operations and traversals.

use thiserror::Error;

use super::children::StoreKind;

/// Result type alias for automaton operations.
pub type Result<T> = std::result::Result<T, AutomatonError>;

/// Errors that can occur while mutating or traversing an automaton.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// The automaton was mutated after the traversal was created.
    ///
    /// The traversal refuses every further advance.
    #[error("underlying automaton has changed, iterator is not valid anymore")]
    StaleIterator,

    /// A cursor was advanced against an automaton other than the one it
    /// was created for.
    #[error("cursor belongs to automaton {expected}, advanced against automaton {found}")]
    ForeignAutomaton {
        /// Id of the automaton the cursor was created for.
        expected: u64,
        /// Id of the automaton passed to `advance`.
        found: u64,
    },

    /// The enumeration scratch buffer could not grow.
    #[error("out of memory while growing the key buffer")]
    OutOfMemory,

    /// The automaton's graph violates one of its own invariants.
    ///
    /// Signals a bug in the automaton, not a condition callers can recover from.
    #[error("inconsistent internal state: {0}")]
    InternalConsistency(&'static str),

    /// A search was requested before the fail links were built.
    #[error("not an Aho-Corasick automaton yet: call make_automaton() first")]
    NotAhoCorasick,

    /// Search bounds outside the input.
    #[error("invalid search range {start}..{end} for input of length {len}")]
    InvalidRange {
        /// Requested start index.
        start: usize,
        /// Requested exclusive end index.
        end: usize,
        /// Length of the input, in units.
        len: usize,
    },

    /// A value was added through the API of another store kind.
    #[error("store kind mismatch: automaton stores {expected:?}, insertion was for {found:?}")]
    StoreMismatch {
        /// The automaton's store kind.
        expected: StoreKind,
        /// The store kind the insertion API belongs to.
        found: StoreKind,
    },
}
