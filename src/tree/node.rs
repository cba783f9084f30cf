//! Trie node types

use std::collections::BTreeMap;

/// A single level of the address tree
///
/// Children are keyed by the next nybble of the address. `count` is the
/// number of full-length addresses stored beneath (and including) this node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    pub(crate) count: u64,
    pub(crate) children: BTreeMap<u8, Node>,
    pub(crate) depth: u8,
}

impl Node {
    /// Create an empty node at the given depth
    pub fn new(depth: u8) -> Self {
        Node {
            count: 0,
            children: BTreeMap::new(),
            depth,
        }
    }

    /// Number of addresses stored in this subtree
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Distance from the root in nybbles (0 for the first level)
    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn children(&self) -> &BTreeMap<u8, Node> {
        &self.children
    }

    pub fn child(&self, nybble: u8) -> Option<&Node> {
        self.children.get(&nybble)
    }

    /// Whether this node has no children
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

/// Follow `nybbles` down from a children map
pub(crate) fn seek<'a>(children: &'a BTreeMap<u8, Node>, nybbles: &[u8]) -> Option<&'a Node> {
    let (first, rest) = nybbles.split_first()?;
    let mut node = children.get(first)?;
    for nybble in rest {
        node = node.children.get(nybble)?;
    }
    Some(node)
}
