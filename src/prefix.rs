//! Network prefixes used to select a subtree

use crate::nybble::{NybbleCodec, NYBBLE_BITS};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A base address plus a prefix length in bits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prefix<A> {
    base: A,
    len: u8,
}

impl<A: NybbleCodec> Prefix<A> {
    /// Create a prefix, rejecting lengths wider than the address
    pub fn new(base: A, len: u8) -> Result<Self> {
        if len > A::BITS {
            return Err(Error::InvalidPrefix(format!(
                "prefix length {} exceeds address width {}",
                len,
                A::BITS
            )));
        }
        Ok(Prefix { base, len })
    }

    /// The prefix covering the whole address space
    pub fn everything(base: A) -> Self {
        Prefix { base, len: 0 }
    }

    /// A prefix matching exactly one address
    pub fn single(base: A) -> Self {
        Prefix { base, len: A::BITS }
    }

    pub fn base(&self) -> A {
        self.base
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    /// Whether the prefix has length zero
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the prefix names one full-width address
    pub fn is_full_width(&self) -> bool {
        self.len == A::BITS
    }

    /// The nybbles to seek along, or `UnalignedPrefix` if the length
    /// does not fall on a nybble boundary
    pub fn nybbles(&self) -> Result<Vec<u8>> {
        if self.len % NYBBLE_BITS != 0 {
            return Err(Error::UnalignedPrefix { bits: self.len });
        }
        Ok(self.base.to_nybbles((self.len / NYBBLE_BITS) as usize))
    }
}

impl<A: NybbleCodec + FromStr> FromStr for Prefix<A> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (addr, len) = match s.split_once('/') {
            Some((addr, len)) => {
                let len = len
                    .parse::<u8>()
                    .map_err(|_| Error::InvalidPrefix(format!("bad prefix length in {:?}", s)))?;
                (addr, len)
            }
            None => (s, A::BITS),
        };
        let base = addr
            .parse::<A>()
            .map_err(|_| Error::InvalidPrefix(format!("bad address in {:?}", s)))?;
        Prefix::new(base, len)
    }
}

impl<A: fmt::Display> fmt::Display for Prefix<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.len)
    }
}
