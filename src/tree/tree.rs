//! Fixed-depth nybble trie holding a set of addresses

use super::iter::{Addresses, Enumeration};
use super::node::{seek, Node};
use super::stats::TreeStats;
use crate::nybble::{path_hex, NybbleCodec};
use crate::prefix::Prefix;
use crate::{store, Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::Path;
use tracing::info;

/// Outcome of a bulk insertion
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InsertSummary {
    pub added: usize,
    pub duplicates: usize,
}

impl InsertSummary {
    pub fn total(&self) -> usize {
        self.added + self.duplicates
    }
}

/// A prefix tree over fixed-width addresses
///
/// Every address is stored as a path of `A::SYMBOLS` nybbles below the
/// root, so addresses sharing leading nybbles share nodes. Each node counts
/// the addresses beneath it, which makes prefix counts a walk of at most
/// `A::SYMBOLS` steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressTree<A> {
    count: u64,
    children: BTreeMap<u8, Node>,
    family: PhantomData<A>,
}

impl<A> Default for AddressTree<A> {
    fn default() -> Self {
        AddressTree {
            count: 0,
            children: BTreeMap::new(),
            family: PhantomData,
        }
    }
}

/// Build a tree from a batch of addresses
pub fn build_from<A, I>(addresses: I, progress_interval: usize) -> AddressTree<A>
where
    A: NybbleCodec,
    I: IntoIterator<Item = A>,
{
    AddressTree::build_from(addresses, progress_interval)
}

impl<A: NybbleCodec> AddressTree<A> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree and insert every address of `addresses` into it
    pub fn build_from<I>(addresses: I, progress_interval: usize) -> Self
    where
        I: IntoIterator<Item = A>,
    {
        let mut tree = Self::new();
        tree.insert_many(addresses, progress_interval);
        tree
    }

    pub(crate) fn from_parts(count: u64, children: BTreeMap<u8, Node>) -> Self {
        AddressTree {
            count,
            children,
            family: PhantomData,
        }
    }

    /// Number of distinct addresses stored
    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Top-level nodes, keyed by the first nybble
    pub fn children(&self) -> &BTreeMap<u8, Node> {
        &self.children
    }

    /// Insert an address. Returns false if it was already present.
    pub fn insert(&mut self, addr: A) -> bool {
        let nybbles = addr.to_nybbles(A::SYMBOLS);
        if seek(&self.children, &nybbles).is_some() {
            return false;
        }

        let mut children = &mut self.children;
        for (depth, &nybble) in nybbles.iter().enumerate() {
            let node = children
                .entry(nybble)
                .or_insert_with(|| Node::new(depth as u8));
            node.count += 1;
            children = &mut node.children;
        }
        self.count += 1;
        true
    }

    /// Insert addresses in order, logging progress every `progress_interval`
    /// items (0 disables progress logging)
    pub fn insert_many<I>(&mut self, addresses: I, progress_interval: usize) -> InsertSummary
    where
        I: IntoIterator<Item = A>,
    {
        let iter = addresses.into_iter();
        let total = match iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        };

        let mut summary = InsertSummary::default();
        for (i, addr) in iter.enumerate() {
            if progress_interval > 0 && i % progress_interval == 0 {
                match total {
                    Some(total) => info!("Adding address {} out of {} to address tree", i, total),
                    None => info!("Adding address {} to address tree", i),
                }
            }
            if self.insert(addr) {
                summary.added += 1;
            } else {
                summary.duplicates += 1;
            }
        }
        summary
    }

    /// Check whether an address is stored
    pub fn contains(&self, addr: &A) -> bool {
        seek(&self.children, &addr.to_nybbles(A::SYMBOLS)).is_some()
    }

    /// Lazily walk every stored address
    pub fn iter(&self) -> Addresses<'_, A> {
        Addresses::under_children(Vec::new(), &self.children)
    }

    /// Every stored address, in no guaranteed order
    pub fn all_addresses(&self) -> Vec<A> {
        self.iter().collect()
    }

    /// Every stored address plus the number of structural defects skipped
    pub fn collect_addresses(&self) -> Enumeration<A> {
        self.iter().into()
    }

    /// Lazily walk the addresses inside `prefix`
    pub fn iter_prefix(&self, prefix: &Prefix<A>) -> Result<Addresses<'_, A>> {
        let nybbles = prefix.nybbles()?;
        if nybbles.is_empty() {
            return Ok(self.iter());
        }
        Ok(match seek(&self.children, &nybbles) {
            Some(node) => Addresses::under_node(nybbles, node),
            None => Addresses::empty(),
        })
    }

    /// Every stored address inside `prefix`
    pub fn addresses_in_prefix(&self, prefix: &Prefix<A>) -> Result<Vec<A>> {
        Ok(self.iter_prefix(prefix)?.collect())
    }

    /// Number of stored addresses inside `prefix`, without enumerating them
    pub fn count_in_prefix(&self, prefix: &Prefix<A>) -> Result<u64> {
        let nybbles = prefix.nybbles()?;
        if nybbles.is_empty() {
            return Ok(self.count);
        }
        if nybbles.len() == A::SYMBOLS {
            return Ok(u64::from(self.contains(&prefix.base())));
        }
        Ok(seek(&self.children, &nybbles).map_or(0, Node::count))
    }

    /// Node counts per depth and related figures
    pub fn stats(&self) -> TreeStats {
        TreeStats::gather(self.count, &self.children, A::SYMBOLS)
    }

    /// Check depth continuity, counters and terminal depth across the tree
    pub fn verify(&self) -> Result<()> {
        let sum: u64 = self.children.values().map(Node::count).sum();
        if sum != self.count {
            return Err(Error::Corruption(format!(
                "root count {} does not match children total {}",
                self.count, sum
            )));
        }
        let mut path = Vec::with_capacity(A::SYMBOLS);
        for (&nybble, child) in &self.children {
            path.push(nybble);
            verify_node(child, &mut path, A::SYMBOLS)?;
            path.pop();
        }
        Ok(())
    }

    /// Persist the tree to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        store::save(self, path)
    }

    /// Load a tree previously written with [`save`](Self::save)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        store::load(path)
    }
}

impl<'a, A: NybbleCodec> IntoIterator for &'a AddressTree<A> {
    type Item = A;
    type IntoIter = Addresses<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<A: NybbleCodec> FromIterator<A> for AddressTree<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self::build_from(iter, 0)
    }
}

impl<A: NybbleCodec> Extend<A> for AddressTree<A> {
    fn extend<I: IntoIterator<Item = A>>(&mut self, iter: I) {
        self.insert_many(iter, 0);
    }
}

fn verify_node(node: &Node, path: &mut Vec<u8>, symbols: usize) -> Result<()> {
    let depth = path.len() - 1;
    if node.depth as usize != depth {
        return Err(Error::Corruption(format!(
            "node at {} records depth {}, expected {}",
            path_hex(path),
            node.depth,
            depth
        )));
    }

    if node.is_terminal() {
        if path.len() != symbols {
            return Err(Error::StructuralDefect {
                depth,
                path: path_hex(path),
            });
        }
        if node.count != 1 {
            return Err(Error::Corruption(format!(
                "terminal node at {} has count {}",
                path_hex(path),
                node.count
            )));
        }
        return Ok(());
    }

    if path.len() >= symbols {
        return Err(Error::Corruption(format!(
            "node at {} has children beyond full depth",
            path_hex(path)
        )));
    }

    let sum: u64 = node.children.values().map(Node::count).sum();
    if sum != node.count {
        return Err(Error::Corruption(format!(
            "node at {} counts {} but children hold {}",
            path_hex(path),
            node.count,
            sum
        )));
    }

    for (&nybble, child) in &node.children {
        path.push(nybble);
        verify_node(child, path, symbols)?;
        path.pop();
    }
    Ok(())
}
