//! Snapshot files: a header followed by compressed, bincode-encoded node records

use super::header::{Header, HEADER_SIZE};
use super::records::{flatten, rebuild, NodeRecord};
use crate::nybble::NybbleCodec;
use crate::tree::AddressTree;
use crate::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const ZSTD_LEVEL: i32 = 3;

/// Encode a tree into snapshot bytes
pub fn encode<A: NybbleCodec>(tree: &AddressTree<A>) -> Result<Vec<u8>> {
    seal::<A>(tree.len(), &flatten(tree))
}

fn seal<A: NybbleCodec>(count: u64, records: &[NodeRecord]) -> Result<Vec<u8>> {
    let raw = bincode::serialize(records)?;
    let payload = zstd::encode_all(raw.as_slice(), ZSTD_LEVEL)?;
    let checksum = blake3::hash(&payload);

    let header = Header::new(A::FAMILY, count, *checksum.as_bytes());
    let mut output = Vec::with_capacity(HEADER_SIZE + payload.len());
    output.extend_from_slice(&header.to_bytes());
    output.extend(payload);
    Ok(output)
}

/// Decode snapshot bytes back into a tree
pub fn decode<A: NybbleCodec>(data: &[u8]) -> Result<AddressTree<A>> {
    let header = Header::from_bytes(data)?;
    if header.family != A::FAMILY {
        return Err(Error::FamilyMismatch {
            expected: A::FAMILY.to_string(),
            found: header.family.to_string(),
        });
    }

    let payload = &data[HEADER_SIZE..];
    if blake3::hash(payload).as_bytes() != &header.checksum {
        return Err(Error::Corruption("Checksum mismatch".into()));
    }

    let raw = zstd::decode_all(payload)?;
    let records: Vec<NodeRecord> = bincode::deserialize(&raw)?;
    rebuild(header.count, &records)
}

/// Write a tree to `path`
///
/// The snapshot goes to a sibling temporary file first and is renamed into
/// place once synced, so an interrupted save leaves the old file intact.
pub fn save<A: NybbleCodec>(tree: &AddressTree<A>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode(tree)?;
    let tmp = temp_path(path);

    let written = write_synced(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    debug!(
        path = %path.display(),
        addresses = tree.len(),
        bytes = bytes.len(),
        "saved address tree"
    );
    Ok(())
}

/// Read a tree from `path`
pub fn load<A: NybbleCodec>(path: impl AsRef<Path>) -> Result<AddressTree<A>> {
    let path = path.as_ref();
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;
    let tree = decode(&data)?;

    debug!(
        path = %path.display(),
        addresses = tree.len(),
        "loaded address tree"
    );
    Ok(tree)
}

/// Read only the header of a snapshot
pub fn read_header(path: impl AsRef<Path>) -> Result<Header> {
    let mut buf = [0u8; HEADER_SIZE];
    let mut file = File::open(path)?;
    file.read_exact(&mut buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::InvalidFile("header truncated".into()),
        _ => Error::Io(e),
    })?;
    Header::from_bytes(&buf)
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nybble::Family;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use tempfile::tempdir;

    fn sample() -> AddressTree<Ipv4Addr> {
        (0..50u8).map(|i| Ipv4Addr::new(10, i, 0, 1)).collect()
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let tree = sample();
        let bytes = encode(&tree).unwrap();
        let restored: AddressTree<Ipv4Addr> = decode(&bytes).unwrap();
        assert_eq!(restored, tree);
    }

    #[test]
    fn test_empty_tree_roundtrip() {
        let tree = AddressTree::<Ipv6Addr>::new();
        let restored: AddressTree<Ipv6Addr> = decode(&encode(&tree).unwrap()).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_overly_deep_payload_is_corruption() {
        let records: Vec<NodeRecord> = (0..200_000u32)
            .map(|i| NodeRecord {
                depth: (i % 256) as u8,
                nybble: 1,
                count: 1,
            })
            .collect();
        let bytes = seal::<Ipv4Addr>(1, &records).unwrap();
        assert!(matches!(
            decode::<Ipv4Addr>(&bytes),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_header_count_must_match_records() {
        let tree = sample();
        let bytes = seal::<Ipv4Addr>(tree.len() + 1, &flatten(&tree)).unwrap();
        assert!(matches!(
            decode::<Ipv4Addr>(&bytes),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_family_mismatch() {
        let bytes = encode(&sample()).unwrap();
        assert!(matches!(
            decode::<Ipv6Addr>(&bytes),
            Err(Error::FamilyMismatch { .. })
        ));
    }

    #[test]
    fn test_corrupted_payload_detected() {
        let mut bytes = encode(&sample()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        assert!(matches!(
            decode::<Ipv4Addr>(&bytes),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_save_replaces_file_and_cleans_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("v4.tree");

        save(&AddressTree::<Ipv4Addr>::new(), &path).unwrap();
        save(&sample(), &path).unwrap();

        let loaded: AddressTree<Ipv4Addr> = load(&path).unwrap();
        assert_eq!(loaded.len(), 50);
        assert!(!temp_path(&path).exists());

        let header = read_header(&path).unwrap();
        assert_eq!(header.family, Family::V4);
        assert_eq!(header.count, 50);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load::<Ipv4Addr>(dir.path().join("missing.tree")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_persistence_failure());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/v4.tree");
        assert!(save(&sample(), &path).is_err());
    }
}
