//! Nybble codec: converts addresses to and from ordered 4-bit symbols
//!
//! The most significant nybble comes first, so a prefix of the symbol
//! sequence is also a prefix of the address' bit pattern.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Bits per symbol
pub const NYBBLE_BITS: u8 = 4;

/// Address family a tree is built for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    V4,
    V6,
}

impl Family {
    pub fn as_byte(&self) -> u8 {
        match self {
            Family::V4 => 4,
            Family::V6 => 6,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            4 => Some(Family::V4),
            6 => Some(Family::V6),
            _ => None,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "ipv4"),
            Family::V6 => write!(f, "ipv6"),
        }
    }
}

/// Fixed-width address that can be split into nybbles
pub trait NybbleCodec: Copy {
    /// Width of the address in bits
    const BITS: u8;
    /// Number of nybbles in a full-width address
    const SYMBOLS: usize = (Self::BITS / NYBBLE_BITS) as usize;
    /// Family tag written into snapshots
    const FAMILY: Family;

    /// The leading `count` nybbles of this address (clamped to `SYMBOLS`)
    fn to_nybbles(&self, count: usize) -> Vec<u8>;

    /// Rebuild an address from leading nybbles; missing trailing nybbles are zero
    fn from_nybbles(nybbles: &[u8]) -> Self;
}

fn split(value: u128, bits: u8, count: usize) -> Vec<u8> {
    let total = (bits / NYBBLE_BITS) as usize;
    (0..count.min(total))
        .map(|i| {
            let shift = bits as usize - NYBBLE_BITS as usize * (i + 1);
            ((value >> shift) & 0xf) as u8
        })
        .collect()
}

fn join(nybbles: &[u8], bits: u8) -> u128 {
    let total = (bits / NYBBLE_BITS) as usize;
    nybbles
        .iter()
        .take(total)
        .enumerate()
        .fold(0u128, |acc, (i, &n)| {
            let shift = bits as usize - NYBBLE_BITS as usize * (i + 1);
            acc | (u128::from(n & 0xf) << shift)
        })
}

impl NybbleCodec for Ipv4Addr {
    const BITS: u8 = 32;
    const FAMILY: Family = Family::V4;

    fn to_nybbles(&self, count: usize) -> Vec<u8> {
        split(u128::from(u32::from(*self)), <Self as NybbleCodec>::BITS, count)
    }

    fn from_nybbles(nybbles: &[u8]) -> Self {
        Ipv4Addr::from(join(nybbles, <Self as NybbleCodec>::BITS) as u32)
    }
}

impl NybbleCodec for Ipv6Addr {
    const BITS: u8 = 128;
    const FAMILY: Family = Family::V6;

    fn to_nybbles(&self, count: usize) -> Vec<u8> {
        split(u128::from(*self), <Self as NybbleCodec>::BITS, count)
    }

    fn from_nybbles(nybbles: &[u8]) -> Self {
        Ipv6Addr::from(join(nybbles, <Self as NybbleCodec>::BITS))
    }
}

/// Render a nybble path as hex digits, e.g. `20010db8`
pub fn path_hex(nybbles: &[u8]) -> String {
    nybbles
        .iter()
        .map(|n| char::from_digit(u32::from(*n), 16).unwrap_or('?'))
        .collect()
}
