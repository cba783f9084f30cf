//! Property tests for the address tree
//!
//! Run with:
//! ```bash
//! cargo test --test tree_properties
//! ```

use addrtree::{store, AddressTree, Error, Prefix};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::net::{Ipv4Addr, Ipv6Addr};

fn v4_addrs() -> impl Strategy<Value = Vec<Ipv4Addr>> {
    // a narrow high byte range forces shared prefixes
    prop::collection::vec((0u32..4, any::<u32>()), 0..200).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(hi, lo)| Ipv4Addr::from((hi << 28) | (lo >> 4)))
            .collect()
    })
}

fn v6_addrs() -> impl Strategy<Value = Vec<Ipv6Addr>> {
    prop::collection::vec((0u128..8, any::<u64>()), 0..100).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(hi, lo)| Ipv6Addr::from((hi << 124) | u128::from(lo)))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_enumeration_matches_inserted_set(addrs in v4_addrs()) {
        let tree = addrtree::build_from(addrs.clone(), 0);
        let expected: BTreeSet<_> = addrs.iter().copied().collect();
        let found: BTreeSet<_> = tree.all_addresses().into_iter().collect();

        prop_assert_eq!(tree.len(), expected.len() as u64);
        prop_assert_eq!(&found, &expected);
        prop_assert_eq!(tree.all_addresses().len(), expected.len());
        prop_assert!(tree.verify().is_ok());
    }

    #[test]
    fn prop_insert_order_does_not_matter(addrs in v4_addrs()) {
        let forward = addrtree::build_from(addrs.clone(), 0);
        let backward = addrtree::build_from(addrs.into_iter().rev(), 0);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_summary_accounts_for_every_insert(addrs in v4_addrs()) {
        let mut tree = AddressTree::new();
        let summary = tree.insert_many(addrs.clone(), 7);
        let distinct: BTreeSet<_> = addrs.iter().collect();

        prop_assert_eq!(summary.total(), addrs.len());
        prop_assert_eq!(summary.added, distinct.len());
        prop_assert_eq!(summary.duplicates, addrs.len() - distinct.len());
    }

    #[test]
    fn prop_prefix_count_matches_listing(addrs in v4_addrs(), other in any::<u32>(), nybbles in 0u8..=8) {
        let tree = addrtree::build_from(addrs.clone(), 0);
        let base = addrs.first().copied().unwrap_or(Ipv4Addr::from(other));
        for candidate in [base, Ipv4Addr::from(other)] {
            let prefix = Prefix::new(candidate, nybbles * 4).unwrap();
            let listed = tree.addresses_in_prefix(&prefix).unwrap();
            prop_assert_eq!(tree.count_in_prefix(&prefix).unwrap(), listed.len() as u64);

            let bits = u32::from(nybbles) * 4;
            let mask = if bits == 0 { 0 } else { u32::MAX << (32 - bits) };
            let want = u32::from(candidate) & mask;
            prop_assert!(listed.iter().all(|a| u32::from(*a) & mask == want));
        }
    }

    #[test]
    fn prop_full_width_prefix_is_membership(addrs in v4_addrs(), other in any::<u32>()) {
        let tree = addrtree::build_from(addrs.clone(), 0);
        let other = Ipv4Addr::from(other);
        let count = tree.count_in_prefix(&Prefix::single(other)).unwrap();
        prop_assert_eq!(count, u64::from(addrs.contains(&other)));
        prop_assert_eq!(tree.contains(&other), addrs.contains(&other));
    }

    #[test]
    fn prop_unaligned_prefix_rejected(len in 0u8..=32) {
        prop_assume!(len % 4 != 0);
        let tree: AddressTree<Ipv4Addr> = AddressTree::new();
        let prefix = Prefix::new(Ipv4Addr::UNSPECIFIED, len).unwrap();
        let count_is_unaligned = matches!(
            tree.count_in_prefix(&prefix),
            Err(Error::UnalignedPrefix { .. })
        );
        let list_is_unaligned = matches!(
            tree.addresses_in_prefix(&prefix),
            Err(Error::UnalignedPrefix { .. })
        );
        prop_assert!(count_is_unaligned);
        prop_assert!(list_is_unaligned);
    }

    #[test]
    fn prop_snapshot_roundtrip_answers_identically(addrs in v6_addrs(), nybbles in 0u8..=32) {
        let tree = addrtree::build_from(addrs.clone(), 0);
        let restored: AddressTree<Ipv6Addr> = store::decode(&store::encode(&tree).unwrap()).unwrap();

        prop_assert_eq!(&restored, &tree);
        prop_assert_eq!(restored.all_addresses(), tree.all_addresses());
        if let Some(first) = addrs.first() {
            prop_assert!(restored.contains(first));
            let prefix = Prefix::new(*first, nybbles * 4).unwrap();
            prop_assert_eq!(
                restored.count_in_prefix(&prefix).unwrap(),
                tree.count_in_prefix(&prefix).unwrap()
            );
        }
    }
}

#[test]
fn test_zero_length_prefix_counts_everything() {
    let addrs: Vec<Ipv6Addr> = (0..64u16)
        .map(|i| Ipv6Addr::new(0x2001, 0xdb8, i, 0, 0, 0, 0, 1))
        .collect();
    let tree = addrtree::build_from(addrs, 16);
    let everything = Prefix::everything(Ipv6Addr::UNSPECIFIED);
    assert_eq!(tree.count_in_prefix(&everything).unwrap(), 64);
    assert_eq!(tree.count_in_prefix(&everything).unwrap(), tree.len());
}
