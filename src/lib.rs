//! # addrtree
//!
//! A fixed-depth nybble trie for large sets of IP addresses.
//!
//! Addresses are split into 4-bit nybbles and stored as paths below a
//! shared root, so addresses with common leading bits share nodes. Every
//! node counts the addresses beneath it, which keeps prefix counts cheap.
//!
//! ## Core Concepts
//!
//! - **Nybbles**: 4-bit symbols, most significant first (8 per IPv4, 32 per IPv6 address)
//! - **Tree**: the root container owning every node; generic over the address family
//! - **Prefixes**: nybble-aligned network prefixes selecting a subtree
//! - **Snapshots**: checksummed, compressed files holding a whole tree
//!
//! ## Example
//!
//! ```
//! use addrtree::Prefix;
//! use std::net::Ipv6Addr;
//!
//! let addrs: Vec<Ipv6Addr> = vec!["2001:db8::1".parse()?, "2001:db8::2".parse()?];
//! let tree = addrtree::build_from(addrs, 1000);
//! let prefix: Prefix<Ipv6Addr> = "2001:db8::/32".parse()?;
//! assert_eq!(tree.count_in_prefix(&prefix)?, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod input;
pub mod nybble;
pub mod prefix;
pub mod shared;
pub mod store;
pub mod tree;

mod error;

pub use config::Config;
pub use error::{Error, Result};
pub use nybble::{Family, NybbleCodec};
pub use prefix::Prefix;
pub use shared::SharedTree;
pub use tree::{build_from, AddressTree, Addresses, Enumeration, InsertSummary, Node, TreeStats};

/// Snapshot format version
pub const VERSION: u32 = 1;

/// Magic bytes for snapshot identification
pub const MAGIC: &[u8; 8] = b"ADDRTREE";
