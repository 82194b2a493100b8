//! An index arena for trie nodes.
//!
//! Nodes are addressed by [`NodeId`] handles instead of references, so the
//! trie edges and the fail links can both point at the same node without
//! either owning it twice. Slots released by key removal go on a free list
//! and are handed out again by later allocations.

use super::children::TrieNode;

/// Handle of a node inside an automaton's arena.
///
/// A handle is only meaningful for the automaton (and the version of it)
/// it was obtained from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The root node of every automaton.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn get(self) -> usize {
        self.0 as usize
    }
}

pub(crate) struct NodeArena<V> {
    nodes: Vec<TrieNode<V>>,
    free_list: Vec<NodeId>,
}

impl<V> NodeArena<V> {
    /// Creates an arena holding only a root node.
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(TrieNode::new(0));
        NodeArena {
            nodes,
            free_list: Vec::new(),
        }
    }

    /// Allocates a node, reusing a released slot when one is available.
    pub fn alloc(&mut self, node: TrieNode<V>) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.nodes[id.get()] = node;
            id
        } else {
            let id = NodeId(
                u32::try_from(self.nodes.len()).expect("node arena exceeds u32::MAX nodes"),
            );
            self.nodes.push(node);
            id
        }
    }

    /// Releases a slot. Its contents are replaced with an empty sentinel
    /// and the slot is queued for reuse.
    pub fn release(&mut self, id: NodeId) {
        debug_assert!(id != NodeId::ROOT, "the root node is never released");
        self.nodes[id.get()] = TrieNode::new(0);
        self.free_list.push(id);
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TrieNode<V> {
        &self.nodes[id.get()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut TrieNode<V> {
        &mut self.nodes[id.get()]
    }

    /// Returns the number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_arena_holds_root() {
        let arena = NodeArena::<()>::new();
        assert_eq!(arena.len(), 1);
        assert!(!arena.node(NodeId::ROOT).is_terminal());
    }

    #[test]
    fn released_slots_are_reused() {
        let mut arena = NodeArena::<()>::new();
        let a = arena.alloc(TrieNode::new(b'a'));
        let b = arena.alloc(TrieNode::new(b'b'));
        assert_eq!(arena.len(), 3);

        arena.release(a);
        assert_eq!(arena.len(), 2);

        let c = arena.alloc(TrieNode::new(b'c'));
        assert_eq!(c, a);
        assert_eq!(arena.node(c).byte(), b'c');
        assert_eq!(arena.node(b).byte(), b'b');
        assert_eq!(arena.len(), 3);
    }
}
