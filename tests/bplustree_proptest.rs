//! Property tests for the B+ tree.
//!
//! Random operation sequences are applied to both a `BPlusTree` and a
//! `BTreeMap` model; after every step the tree must validate and agree
//! with the model.

use std::collections::BTreeMap;

use bptree::BPlusTree;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u16, u32),
    Append(u16, u32),
    Change(u16, u32),
    Delete(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Narrow key space so deletes and duplicates actually hit
    let key = 0u16..200;
    prop_oneof![
        4 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        1 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Append(k, v)),
        1 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Change(k, v)),
        3 => key.prop_map(Op::Delete),
    ]
}

fn assert_matches_model(
    tree: &BPlusTree<u16, u32>,
    model: &BTreeMap<u16, Vec<u32>>,
) -> Result<(), TestCaseError> {
    prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
    prop_assert_eq!(tree.len(), model.len());

    let chain: Vec<(u16, Vec<u32>)> = tree.iter().map(|(k, b)| (*k, b.clone())).collect();
    let expected: Vec<(u16, Vec<u32>)> = model.iter().map(|(k, b)| (*k, b.clone())).collect();
    prop_assert_eq!(chain, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Order, depth and fan-out invariants hold after every operation.
    #[test]
    fn invariants_hold_for_random_operations(
        maximum in 2usize..9,
        ops in prop::collection::vec(op_strategy(), 0..400),
    ) {
        let mut tree = BPlusTree::new(maximum);
        let mut model: BTreeMap<u16, Vec<u32>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let (inserted, leaf) = tree.insert(k, v);
                    prop_assert_eq!(inserted, !model.contains_key(&k));
                    prop_assert!(tree.leaf(leaf).unwrap().contains(&k));
                    model.entry(k).or_insert_with(|| vec![v]);
                }
                Op::Append(k, v) => {
                    tree.append(k, v);
                    model.entry(k).or_default().push(v);
                }
                Op::Change(k, v) => {
                    let changed = tree.change(&k, v);
                    prop_assert_eq!(changed, model.contains_key(&k));
                    if let Some(bucket) = model.get_mut(&k) {
                        *bucket = vec![v];
                    }
                }
                Op::Delete(k) => {
                    let removed = tree.remove(&k);
                    prop_assert_eq!(removed, model.remove(&k));
                }
            }
            assert_matches_model(&tree, &model)?;
        }
    }

    /// `insert` then `query` finds the value; `delete` then `query` finds nothing.
    #[test]
    fn insert_query_delete_round_trip(
        keys in prop::collection::btree_set(any::<i32>(), 1..300),
        maximum in 2usize..12,
    ) {
        let mut tree = BPlusTree::new(maximum);
        for &k in &keys {
            prop_assert!(tree.insert(k, k as i64 * 2).0);
        }
        for &k in &keys {
            prop_assert_eq!(tree.query(&k), Some(&vec![k as i64 * 2]));
        }
        for &k in &keys {
            prop_assert!(tree.delete(&k));
            prop_assert_eq!(tree.query(&k), None);
        }
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.depth(), 0);
        prop_assert!(tree.validate().is_ok());
    }

    /// A second insert of the same key fails and changes nothing.
    #[test]
    fn duplicate_insert_is_idempotent(
        keys in prop::collection::vec(0u8..100, 1..200),
    ) {
        let mut tree = BPlusTree::new(4);
        for &k in &keys {
            tree.insert(k, 0u8);
        }
        let before: Vec<u8> = tree.iter().map(|(k, _)| *k).collect();
        let stats = tree.stats();

        for &k in &keys {
            let (inserted, _) = tree.insert(k, 1);
            prop_assert!(!inserted);
        }

        let after: Vec<u8> = tree.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(tree.stats(), stats);
        prop_assert!(tree.iter().all(|(_, bucket)| bucket == &vec![0u8]));
    }

    /// `range_query` matches a linear scan over the present keys.
    #[test]
    fn range_query_matches_linear_scan(
        keys in prop::collection::btree_set(0i32..1000, 0..300),
        deletes in prop::collection::vec(0i32..1000, 0..100),
        a in -10i32..1010,
        b in -10i32..1010,
        maximum in 2usize..10,
    ) {
        let mut tree = BPlusTree::new(maximum);
        for &k in &keys {
            tree.insert(k, ());
        }
        let mut present = keys.clone();
        for k in deletes {
            tree.delete(&k);
            present.remove(&k);
        }

        let (low, high) = (a.min(b), a.max(b));
        let found: Vec<i32> = tree.range_query(&low, &high).into_iter().map(|(k, _)| *k).collect();
        let expected: Vec<i32> = present.iter().copied().filter(|k| low <= *k && *k <= high).collect();
        prop_assert_eq!(found, expected);

        // Reversed bounds yield nothing unless they coincide
        if low < high {
            prop_assert!(tree.range_query(&high, &low).is_empty());
        }
    }
}
