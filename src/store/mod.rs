//! Snapshot persistence for address trees
//!
//! Trees are flattened into pre-order node records, serialized with bincode,
//! compressed with zstd and prefixed by a fixed header carrying the address
//! family, count and a BLAKE3 checksum.

mod header;
mod records;
mod snapshot;

pub use header::{Header, HEADER_SIZE};
pub use snapshot::{decode, encode, load, read_header, save};
