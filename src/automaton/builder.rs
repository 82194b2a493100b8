use std::collections::VecDeque;

use smallvec::SmallVec;

use super::node_arena::{NodeArena, NodeId};
use super::unit_trait::InputUnit;

/// Trait for types that can be used as a key of an automaton.
///
/// Implemented for string types, which are stored as their UTF-8 bytes,
/// and for slices, vectors and arrays of any [`InputUnit`], which are
/// stored as the concatenation of each unit's bytes. A key built from
/// units of some type is found by searching text made of the same units.
pub trait IntoKey {
    /// Collects this key into a byte buffer.
    fn collect_key(self) -> SmallVec<[u8; 32]>;
}

// String types → UTF-8 bytes

impl IntoKey for &str {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoKey for &&str {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoKey for String {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoKey for &String {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

// Unit sequences → decomposed bytes

fn collect_units<U: InputUnit>(units: &[U]) -> SmallVec<[u8; 32]> {
    units.iter().flat_map(|&unit| unit.to_bytes()).collect()
}

impl<U: InputUnit> IntoKey for &[U] {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        collect_units(self)
    }
}

impl<U: InputUnit> IntoKey for Vec<U> {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        collect_units(&self)
    }
}

impl<U: InputUnit> IntoKey for &Vec<U> {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        collect_units(self)
    }
}

impl<U: InputUnit, const N: usize> IntoKey for [U; N] {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        collect_units(&self)
    }
}

impl<U: InputUnit, const N: usize> IntoKey for &[U; N] {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        collect_units(self)
    }
}

/// Computes the fail and output links of every node, breadth first.
///
/// A node's fail link is the node of the longest proper suffix of its
/// path that is also a trie path. Its output link is itself when it is
/// terminal, otherwise its fail target's output link. Both depend only on
/// shallower nodes, which the breadth-first order has already finished.
///
/// Returns the number of nodes linked.
pub(crate) fn build_fail_links<V>(arena: &mut NodeArena<V>) -> usize {
    let root = NodeId::ROOT;
    {
        let root_node = arena.node_mut(root);
        root_node.fail = None;
        root_node.output = None;
    }

    let mut linked = 0;
    let mut queue = VecDeque::from([root]);
    while let Some(parent) = queue.pop_front() {
        let parent_fail = arena.node(parent).fail;
        let edges: SmallVec<[(u8, NodeId); 8]> = arena.node(parent).children().iter().collect();
        for (byte, child) in edges {
            let fail = if parent == root {
                root
            } else {
                suffix_target(arena, parent_fail, byte)
            };
            let output = if arena.node(child).is_terminal() {
                Some(child)
            } else {
                arena.node(fail).output
            };

            let node = arena.node_mut(child);
            node.fail = Some(fail);
            node.output = output;
            linked += 1;
            queue.push_back(child);
        }
    }
    linked
}

/// Follows fail links from `start` until a node with an edge labelled
/// `byte` is found, returning that edge's target, or the root.
fn suffix_target<V>(arena: &NodeArena<V>, start: Option<NodeId>, byte: u8) -> NodeId {
    let mut current = start;
    while let Some(id) = current {
        if let Some(next) = arena.node(id).get(byte) {
            return next;
        }
        current = arena.node(id).fail;
    }
    NodeId::ROOT
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn str_keys_are_utf8_bytes() {
        assert_eq!("hé".collect_key().as_slice(), "hé".as_bytes());
        assert_eq!(String::from("abc").collect_key().as_slice(), b"abc");
        assert_eq!(IntoKey::collect_key(&"x").as_slice(), b"x");
    }

    #[test]
    fn byte_sequences_are_stored_as_is() {
        assert_eq!([1u8, 2, 3].collect_key().as_slice(), &[1, 2, 3]);
        assert_eq!(b"he".collect_key().as_slice(), b"he");
        assert_eq!(vec![9u8, 8].collect_key().as_slice(), &[9, 8]);
    }

    #[test]
    fn wide_units_are_decomposed() {
        let key = [0x0041u16, 0x0142].collect_key();
        assert_eq!(key.as_slice(), &[0x41, 0x42, 0x01]);

        let chars: Vec<char> = "aé".chars().collect();
        assert_eq!(chars.collect_key().as_slice(), &[b'a', 0xe9]);
    }
}
