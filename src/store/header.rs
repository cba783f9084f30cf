//! Fixed-size snapshot header
//!
//! ```text
//! [HEADER: 56 bytes]
//!   - magic: 8 bytes ("ADDRTREE")
//!   - version: 4 bytes (u32 LE)
//!   - family: 1 byte (4 or 6)
//!   - reserved: 3 bytes
//!   - address_count: 8 bytes (u64 LE)
//!   - checksum: 32 bytes (BLAKE3 of the payload)
//! ```

use crate::nybble::Family;
use crate::{Error, Result, MAGIC, VERSION};

pub const HEADER_SIZE: usize = 56;

/// Decoded snapshot header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: u32,
    pub family: Family,
    pub count: u64,
    pub checksum: [u8; 32],
}

impl Header {
    pub fn new(family: Family, count: u64, checksum: [u8; 32]) -> Self {
        Header {
            version: VERSION,
            family,
            count,
            checksum,
        }
    }

    /// Checksum as a hex string
    pub fn checksum_hex(&self) -> String {
        hex::encode(self.checksum)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[0..8].copy_from_slice(MAGIC);
        header[8..12].copy_from_slice(&self.version.to_le_bytes());
        header[12] = self.family.as_byte();
        // reserved: 13..16
        header[16..24].copy_from_slice(&self.count.to_le_bytes());
        header[24..56].copy_from_slice(&self.checksum);
        header
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::InvalidFile(format!(
                "header truncated ({} of {} bytes)",
                data.len(),
                HEADER_SIZE
            )));
        }
        if &data[0..8] != MAGIC {
            return Err(Error::InvalidFile("Invalid magic bytes".into()));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&data[8..12]);
        let version = u32::from_le_bytes(version);
        if version != VERSION {
            return Err(Error::VersionMismatch {
                expected: VERSION,
                found: version,
            });
        }

        let family = Family::from_byte(data[12])
            .ok_or_else(|| Error::Corruption(format!("Invalid family byte: {}", data[12])))?;

        let mut count = [0u8; 8];
        count.copy_from_slice(&data[16..24]);

        let mut checksum = [0u8; 32];
        checksum.copy_from_slice(&data[24..56]);

        Ok(Header {
            version,
            family,
            count: u64::from_le_bytes(count),
            checksum,
        })
    }
}
