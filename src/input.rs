//! Reading address lists from text files

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Parse one address per line. Blank lines and `#` comments are skipped;
/// anything else that fails to parse is an error naming the line.
pub fn read_addresses<A, R>(reader: R) -> Result<Vec<A>>
where
    A: FromStr,
    R: BufRead,
{
    let mut addresses = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let value = line.trim();
        if value.is_empty() || value.starts_with('#') {
            continue;
        }
        let addr = value.parse::<A>().map_err(|_| Error::InvalidAddress {
            line: i + 1,
            value: value.to_string(),
        })?;
        addresses.push(addr);
    }
    Ok(addresses)
}

/// Parse an address list file
pub fn read_addresses_from_path<A: FromStr>(path: impl AsRef<Path>) -> Result<Vec<A>> {
    let file = File::open(path)?;
    read_addresses(BufReader::new(file))
}
