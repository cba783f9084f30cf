//! Structural statistics for an address tree

use super::Node;
use serde::Serialize;
use std::collections::BTreeMap;

/// Shape of a tree: how many nodes sit at each depth and how much the
/// shared prefixes save over storing every address flat
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub addresses: u64,
    pub nodes: usize,
    pub terminals: usize,
    pub defects: usize,
    pub nodes_per_depth: Vec<usize>,
    pub symbols_per_address: usize,
}

impl TreeStats {
    pub(crate) fn gather(count: u64, children: &BTreeMap<u8, Node>, symbols: usize) -> Self {
        let mut stats = TreeStats {
            addresses: count,
            nodes_per_depth: vec![0; symbols],
            symbols_per_address: symbols,
            ..TreeStats::default()
        };

        // depth is the walked path length, not the node's stored depth field
        let mut stack: Vec<(usize, &Node)> = children.values().map(|n| (0, n)).collect();
        while let Some((depth, node)) = stack.pop() {
            stats.nodes += 1;
            if depth >= stats.nodes_per_depth.len() {
                stats.nodes_per_depth.resize(depth + 1, 0);
            }
            stats.nodes_per_depth[depth] += 1;

            if node.is_terminal() {
                if depth + 1 == symbols {
                    stats.terminals += 1;
                } else {
                    stats.defects += 1;
                }
            }
            stack.extend(node.children.values().map(|child| (depth + 1, child)));
        }
        stats
    }

    /// Nybbles a flat list would store per nybble actually stored in the tree
    pub fn sharing_ratio(&self) -> f64 {
        if self.nodes == 0 {
            return 0.0;
        }
        (self.addresses as f64 * self.symbols_per_address as f64) / self.nodes as f64
    }
}
