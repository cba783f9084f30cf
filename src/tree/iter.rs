//! Depth-first enumeration of stored addresses

use super::Node;
use crate::nybble::{path_hex, NybbleCodec};
use std::collections::{btree_map, BTreeMap};
use tracing::warn;

/// Lazy iterator over the addresses stored below a node
///
/// Paths are rebuilt from the nybbles walked so far, starting from the
/// nybbles that led to the starting node. A childless node found short of
/// full depth yields nothing; it is logged and counted in [`defects`].
///
/// [`defects`]: Addresses::defects
pub struct Addresses<'a, A> {
    stack: Vec<btree_map::Iter<'a, u8, Node>>,
    path: Vec<u8>,
    pending: Option<A>,
    defects: usize,
}

impl<'a, A: NybbleCodec> Addresses<'a, A> {
    pub(crate) fn empty() -> Self {
        Addresses {
            stack: Vec::new(),
            path: Vec::new(),
            pending: None,
            defects: 0,
        }
    }

    /// Walk everything below a children map reached through `path`
    pub(crate) fn under_children(path: Vec<u8>, children: &'a BTreeMap<u8, Node>) -> Self {
        Addresses {
            stack: vec![children.iter()],
            path,
            pending: None,
            defects: 0,
        }
    }

    /// Walk the subtree rooted at `node`, which sits at the end of `path`
    pub(crate) fn under_node(path: Vec<u8>, node: &'a Node) -> Self {
        if !node.is_terminal() {
            return Self::under_children(path, &node.children);
        }
        let mut iter = Addresses {
            path,
            ..Self::empty()
        };
        iter.pending = iter.terminal(node.depth);
        iter
    }

    /// Number of childless nodes found short of full depth so far
    pub fn defects(&self) -> usize {
        self.defects
    }

    fn terminal(&mut self, depth: u8) -> Option<A> {
        if self.path.len() == A::SYMBOLS {
            return Some(A::from_nybbles(&self.path));
        }
        warn!(
            depth,
            path = %path_hex(&self.path),
            "ran out of children before full depth while enumerating addresses"
        );
        self.defects += 1;
        None
    }
}

impl<A: NybbleCodec> Iterator for Addresses<'_, A> {
    type Item = A;

    fn next(&mut self) -> Option<A> {
        if let Some(addr) = self.pending.take() {
            return Some(addr);
        }
        loop {
            match self.stack.last_mut()?.next() {
                Some((&nybble, node)) => {
                    self.path.push(nybble);
                    if node.is_terminal() {
                        let found = self.terminal(node.depth);
                        self.path.pop();
                        if found.is_some() {
                            return found;
                        }
                    } else {
                        self.stack.push(node.children.iter());
                    }
                }
                None => {
                    self.stack.pop();
                    self.path.pop();
                }
            }
        }
    }
}

/// Eagerly collected addresses together with the defects met on the way
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enumeration<A> {
    pub addresses: Vec<A>,
    pub defects: usize,
}

impl<'a, A: NybbleCodec> From<Addresses<'a, A>> for Enumeration<A> {
    fn from(mut iter: Addresses<'a, A>) -> Self {
        let addresses = iter.by_ref().collect();
        Enumeration {
            addresses,
            defects: iter.defects(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn insert(root: &mut BTreeMap<u8, Node>, nybbles: &[u8]) {
        let mut children = root;
        for (depth, &n) in nybbles.iter().enumerate() {
            let node = children.entry(n).or_insert_with(|| Node::new(depth as u8));
            node.count += 1;
            children = &mut node.children;
        }
    }

    #[test]
    fn test_empty_children_yield_nothing() {
        let root = BTreeMap::new();
        let mut iter = Addresses::<Ipv4Addr>::under_children(Vec::new(), &root);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.defects(), 0);
    }

    #[test]
    fn test_rebuilds_full_paths_in_order() {
        let mut root = BTreeMap::new();
        let a = Ipv4Addr::new(10, 0, 0, 2);
        let b = Ipv4Addr::new(10, 0, 0, 1);
        insert(&mut root, &a.to_nybbles(8));
        insert(&mut root, &b.to_nybbles(8));

        let found: Vec<Ipv4Addr> = Addresses::under_children(Vec::new(), &root).collect();
        assert_eq!(found, vec![b, a]);
    }

    #[test]
    fn test_short_branch_is_counted_as_defect() {
        let mut root = BTreeMap::new();
        let good = Ipv4Addr::new(10, 0, 0, 1);
        insert(&mut root, &good.to_nybbles(8));
        insert(&mut root, &[0xc, 0x0, 0xa]);

        let enumeration: Enumeration<Ipv4Addr> =
            Addresses::under_children(Vec::new(), &root).into();
        assert_eq!(enumeration.addresses, vec![good]);
        assert_eq!(enumeration.defects, 1);
    }

    #[test]
    fn test_terminal_start_yields_itself() {
        let mut root = BTreeMap::new();
        let addr = Ipv4Addr::new(192, 168, 0, 1);
        let path = addr.to_nybbles(8);
        insert(&mut root, &path);
        let leaf = super::super::node::seek(&root, &path).unwrap();

        let found: Vec<Ipv4Addr> = Addresses::under_node(path, leaf).collect();
        assert_eq!(found, vec![addr]);
    }
}
