//! Nybble trie over fixed-width addresses
//!
//! This implements a fixed-depth prefix tree where:
//! - Each level consumes one 4-bit nybble of the address
//! - Addresses sharing leading nybbles share nodes
//! - Every node counts the addresses stored beneath it

mod iter;
mod node;
mod stats;
#[allow(clippy::module_inception)]
mod tree;

pub use iter::{Addresses, Enumeration};
pub use node::Node;
pub use stats::TreeStats;
pub use tree::{build_from, AddressTree, InsertSummary};
