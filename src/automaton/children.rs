use super::error::{AutomatonError, Result};
use super::node_arena::NodeId;

/// What a terminal node's payload holds, fixed for the automaton's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// An arbitrary value of the automaton's value type per key.
    Any,
    /// One integer per key, supplied by the caller.
    Integer,
    /// One integer per key, equal to the key's length in bytes.
    Length,
}

/// A payload as stored in a terminal node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload<V> {
    /// Value of an automaton with [`StoreKind::Any`].
    Object(V),
    /// Value of an automaton with [`StoreKind::Integer`] or [`StoreKind::Length`].
    Integer(i64),
}

/// A borrowed view of a terminal node's payload.
#[derive(Debug, PartialEq, Eq)]
pub enum Value<'a, V> {
    /// Value of an automaton with [`StoreKind::Any`].
    Object(&'a V),
    /// Value of an automaton with [`StoreKind::Integer`] or [`StoreKind::Length`].
    Integer(i64),
}

impl<V> Clone for Value<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Value<'_, V> {}

impl<V> Payload<V> {
    /// Borrows the payload, checking it against the automaton's store kind.
    pub(crate) fn value(&self, store: StoreKind) -> Result<Value<'_, V>> {
        match (store, self) {
            (StoreKind::Any, Payload::Object(v)) => Ok(Value::Object(v)),
            (StoreKind::Integer | StoreKind::Length, Payload::Integer(n)) => {
                Ok(Value::Integer(*n))
            }
            _ => Err(AutomatonError::InternalConsistency(
                "payload does not match the store kind",
            )),
        }
    }
}

/// A compact representation of a node's outgoing edges that doesn't
/// allocate until there are at least three of them.
///
/// Edges are kept sorted by byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Children {
    /// No children.
    None,
    /// Exactly one child (byte, node).
    One((u8, NodeId)),
    /// Exactly two children (byte1, node1, byte2, node2).
    Two((u8, NodeId, u8, NodeId)),
    /// Three or more children stored in a vector.
    Many(Vec<(u8, NodeId)>),
}

impl Children {
    /// Gets the child at the specified index.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<(u8, NodeId)> {
        match self {
            Children::None => None,
            Children::One(child) => match index {
                0 => Some(*child),
                _ => None,
            },
            Children::Two((b1, n1, b2, n2)) => match index {
                0 => Some((*b1, *n1)),
                1 => Some((*b2, *n2)),
                _ => None,
            },
            Children::Many(children) => children.get(index).copied(),
        }
    }

    /// Returns the node the edge labelled `byte` leads to.
    #[inline]
    pub fn find(&self, byte: u8) -> Option<NodeId> {
        match self {
            Children::None => None,
            Children::One((b, node)) => (*b == byte).then_some(*node),
            Children::Two((b1, n1, b2, n2)) => {
                if byte == *b1 {
                    Some(*n1)
                } else if byte == *b2 {
                    Some(*n2)
                } else {
                    None
                }
            }
            Children::Many(children) => children
                .binary_search_by_key(&byte, |&(b, _)| b)
                .ok()
                .map(|pos| children[pos].1),
        }
    }

    /// Returns the number of children.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Two(_) => 2,
            Children::Many(children) => children.len(),
        }
    }

    /// True if there are no children.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Children::None)
    }

    /// Inserts an edge in sorted position.
    ///
    /// The byte must not be present yet.
    pub(crate) fn insert(&mut self, byte: u8, child: NodeId) {
        debug_assert!(self.find(byte).is_none(), "insert: byte already exists");
        *self = match std::mem::replace(self, Children::None) {
            Children::None => Children::One((byte, child)),
            Children::One((b1, n1)) => {
                if byte < b1 {
                    Children::Two((byte, child, b1, n1))
                } else {
                    Children::Two((b1, n1, byte, child))
                }
            }
            Children::Two((b1, n1, b2, n2)) => {
                let mut v = vec![(b1, n1), (b2, n2), (byte, child)];
                v.sort_by_key(|&(b, _)| b);
                Children::Many(v)
            }
            Children::Many(mut children) => {
                let pos = children.partition_point(|&(b, _)| b < byte);
                children.insert(pos, (byte, child));
                Children::Many(children)
            }
        };
    }

    /// Removes the edge labelled `byte`, returning the node it led to.
    pub(crate) fn remove(&mut self, byte: u8) -> Option<NodeId> {
        let removed = self.find(byte)?;
        *self = match std::mem::replace(self, Children::None) {
            Children::None | Children::One(_) => Children::None,
            Children::Two((b1, n1, b2, n2)) => {
                if b1 == byte {
                    Children::One((b2, n2))
                } else {
                    Children::One((b1, n1))
                }
            }
            Children::Many(mut children) => {
                children.retain(|&(b, _)| b != byte);
                match children.len() {
                    2 => {
                        let [(b1, n1), (b2, n2)] = [children[0], children[1]];
                        Children::Two((b1, n1, b2, n2))
                    }
                    _ => Children::Many(children),
                }
            }
        };
        Some(removed)
    }

    /// Returns an iterator over the edges, in ascending byte order.
    #[inline]
    pub fn iter(&self) -> ChildIter<'_> {
        ChildIter {
            children: self,
            index: Some(0),
        }
    }
}

/// An iterator over the outgoing edges of a node.
#[derive(Clone)]
pub struct ChildIter<'a> {
    children: &'a Children,
    index: Option<usize>,
}

impl Iterator for ChildIter<'_> {
    type Item = (u8, NodeId);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index?;
        let next_child = self.children.get(index);
        self.index = if next_child.is_some() {
            index.checked_add(1)
        } else {
            None
        };
        next_child
    }

    /// Since we know the exact size, we can do better than the default implementation.
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.index {
            Some(i) => self.children.len().saturating_sub(i),
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChildIter<'_> {}

/// A vertex of the trie.
#[derive(Clone, Debug)]
pub struct TrieNode<V> {
    children: Children,
    byte: u8,
    pub(crate) payload: Option<Payload<V>>,
    pub(crate) fail: Option<NodeId>,
    pub(crate) output: Option<NodeId>,
}

impl<V> TrieNode<V> {
    /// Creates a non-terminal node reached through an edge labelled `byte`.
    pub fn new(byte: u8) -> Self {
        TrieNode {
            children: Children::None,
            byte,
            payload: None,
            fail: None,
            output: None,
        }
    }

    /// Label of the edge leading into this node. Zero for the root.
    #[inline]
    pub fn byte(&self) -> u8 {
        self.byte
    }

    /// True if the path from the root to this node spells a stored key.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.payload.is_some()
    }

    /// The payload, present only on terminal nodes.
    #[inline]
    pub fn payload(&self) -> Option<&Payload<V>> {
        self.payload.as_ref()
    }

    /// The node of the longest proper suffix of this node's path that is
    /// also a trie path. `None` for the root, and for every node before
    /// the fail links are built.
    #[inline]
    pub fn fail(&self) -> Option<NodeId> {
        self.fail
    }

    /// The nearest terminal node on the fail chain starting at this node,
    /// this node included.
    #[inline]
    pub fn output(&self) -> Option<NodeId> {
        self.output
    }

    /// Returns the child the edge labelled `byte` leads to.
    #[inline]
    pub fn get(&self, byte: u8) -> Option<NodeId> {
        self.children.find(byte)
    }

    /// Returns the outgoing edges of this node.
    #[inline]
    pub fn children(&self) -> &Children {
        &self.children
    }

    #[inline]
    pub(crate) fn children_mut(&mut self) -> &mut Children {
        &mut self.children
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(n: u32) -> NodeId {
        NodeId(n)
    }

    #[test]
    fn no_children() {
        let n = TrieNode::<()>::new(b'a');
        assert_eq!(n.children().iter().next(), None);
        assert_eq!(n.children().len(), 0);
        assert!(n.children().is_empty());
    }

    #[test]
    fn children_stay_sorted() {
        let mut c = Children::None;
        c.insert(b'm', id(1));
        c.insert(b'c', id(2));
        assert!(matches!(c, Children::Two(_)));
        c.insert(b'x', id(3));
        c.insert(b'a', id(4));
        let bytes: Vec<u8> = c.iter().map(|(b, _)| b).collect();
        assert_eq!(bytes, b"acmx");
        assert_eq!(c.find(b'x'), Some(id(3)));
        assert_eq!(c.find(b'b'), None);
        assert_eq!(c.iter().len(), 4);
    }

    #[test]
    fn remove_collapses_representation() {
        let mut c = Children::None;
        c.insert(b'a', id(1));
        c.insert(b'b', id(2));
        c.insert(b'c', id(3));
        assert_eq!(c.remove(b'b'), Some(id(2)));
        assert!(matches!(c, Children::Two(_)));
        assert_eq!(c.remove(b'z'), None);
        assert_eq!(c.remove(b'a'), Some(id(1)));
        assert_eq!(c, Children::One((b'c', id(3))));
        assert_eq!(c.remove(b'c'), Some(id(3)));
        assert_eq!(c, Children::None);
    }

    #[test]
    fn all_256_children() {
        let mut c = Children::None;
        for b in (0..=255u8).rev() {
            c.insert(b, id(u32::from(b) + 1));
        }
        assert_eq!(c.len(), 256);
        for b in 0..=255u8 {
            assert_eq!(c.find(b), Some(id(u32::from(b) + 1)));
        }
        assert!(c.iter().map(|(b, _)| b).is_sorted());
    }

    #[test]
    fn payload_must_match_store() {
        let any = Payload::Object("x");
        assert_eq!(any.value(StoreKind::Any), Ok(Value::Object(&"x")));
        assert!(matches!(
            any.value(StoreKind::Integer),
            Err(AutomatonError::InternalConsistency(_))
        ));

        let int: Payload<&str> = Payload::Integer(7);
        assert_eq!(int.value(StoreKind::Length), Ok(Value::Integer(7)));
        assert!(int.value(StoreKind::Any).is_err());
    }
}
