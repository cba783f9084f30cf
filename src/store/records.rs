//! Flat pre-order node records
//!
//! Trees are stored as a list of `(depth, nybble, count)` records in
//! pre-order rather than as nested maps, so decoding is a loop whose open
//! path can never grow past `A::SYMBOLS`.

use crate::nybble::NybbleCodec;
use crate::tree::{AddressTree, Node};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct NodeRecord {
    pub depth: u8,
    pub nybble: u8,
    pub count: u64,
}

/// Walk a tree in pre-order, children in ascending nybble order
pub(crate) fn flatten<A: NybbleCodec>(tree: &AddressTree<A>) -> Vec<NodeRecord> {
    let mut records = Vec::new();
    let mut stack: Vec<(u8, u8, &Node)> = tree
        .children()
        .iter()
        .rev()
        .map(|(&nybble, node)| (0, nybble, node))
        .collect();

    while let Some((depth, nybble, node)) = stack.pop() {
        records.push(NodeRecord {
            depth,
            nybble,
            count: node.count(),
        });
        let next = depth.saturating_add(1);
        stack.extend(
            node.children()
                .iter()
                .rev()
                .map(|(&nybble, child)| (next, nybble, child)),
        );
    }
    records
}

/// Rebuild a tree from pre-order records
pub(crate) fn rebuild<A: NybbleCodec>(count: u64, records: &[NodeRecord]) -> Result<AddressTree<A>> {
    let mut root = BTreeMap::new();
    let mut open: Vec<(u8, Node)> = Vec::with_capacity(A::SYMBOLS);

    for (i, record) in records.iter().enumerate() {
        let depth = record.depth as usize;
        if record.nybble > 0xf {
            return Err(Error::Corruption(format!(
                "record {} has nybble {}",
                i, record.nybble
            )));
        }
        if depth >= A::SYMBOLS {
            return Err(Error::Corruption(format!(
                "record {} at depth {} is past full depth {}",
                i,
                depth,
                A::SYMBOLS
            )));
        }
        if depth > open.len() {
            return Err(Error::Corruption(format!(
                "record {} jumps from depth {} to {}",
                i,
                open.len(),
                depth
            )));
        }

        close(&mut open, &mut root, depth)?;
        let mut node = Node::new(record.depth);
        node.count = record.count;
        open.push((record.nybble, node));
    }
    close(&mut open, &mut root, 0)?;

    let sum: u64 = root.values().map(Node::count).sum();
    if sum != count {
        return Err(Error::Corruption(format!(
            "header records {} addresses, tree holds {}",
            count, sum
        )));
    }
    Ok(AddressTree::from_parts(count, root))
}

/// Attach open nodes to their parents until only `depth` remain open
fn close(open: &mut Vec<(u8, Node)>, root: &mut BTreeMap<u8, Node>, depth: usize) -> Result<()> {
    while open.len() > depth {
        let Some((nybble, node)) = open.pop() else {
            break;
        };
        let parent = match open.last_mut() {
            Some((_, parent)) => &mut parent.children,
            None => &mut *root,
        };
        if parent.insert(nybble, node).is_some() {
            return Err(Error::Corruption(format!(
                "nybble {:x} appears twice under one parent",
                nybble
            )));
        }
    }
    Ok(())
}
