// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Behavioral parity tests across the interval map backings.
//!
//! Every scenario runs against the array backing, the tree backing, and both modes of the
//! hybrid map, and expects identical observable results.

use understory_range_map::{
    ArrayIntervalMap, HybridIntervalMap, IndexRange, IntervalMap, MapMode, SplitOp,
    TreeIntervalMap,
};

fn entries<M: IntervalMap<Value = u32>>(map: &M) -> Vec<(u64, u64, u32)> {
    map.iter().map(|(r, v)| (r.begin, r.end, *v)).collect()
}

fn run_script<M: IntervalMap<Value = u32>>(map: &mut M) -> Vec<(u64, u64, u32)> {
    map.insert(IndexRange::new(0, 4), 1);
    map.insert(IndexRange::new(8, 12), 2);
    map.overwrite_range(IndexRange::new(2, 10), 3);
    map.split(6, SplitOp::KeepBoth);
    map.insert(IndexRange::new(12, 14), 4);
    map.remove_range(IndexRange::new(13, 16));
    entries(map)
}

#[test]
fn all_backings_agree_on_a_mutation_script() {
    let expected = vec![(0, 2, 1), (2, 6, 3), (6, 10, 3), (10, 12, 2), (12, 13, 4)];

    let mut array = ArrayIntervalMap::<u32, 16>::new(16);
    let mut tree = TreeIntervalMap::new();
    let mut small = HybridIntervalMap::<u32, 16>::new(16);
    let mut big = HybridIntervalMap::<u32, 8>::new(16);
    assert_eq!(small.mode(), MapMode::Small);
    assert_eq!(big.mode(), MapMode::Big);

    assert_eq!(run_script(&mut array), expected);
    assert_eq!(run_script(&mut tree), expected);
    assert_eq!(run_script(&mut small), expected);
    assert_eq!(run_script(&mut big), expected);
}

#[test]
fn lookups_agree_across_backings() {
    let mut small = HybridIntervalMap::<u32, 24>::new(24);
    let mut big = HybridIntervalMap::<u32, 24>::new(1 << 16);
    assert!(small.is_small() && big.is_big());
    for map in [&mut small, &mut big] {
        map.insert(IndexRange::new(4, 8), 1);
        map.insert(IndexRange::new(16, 20), 2);
    }

    for index in 0..24 {
        assert_eq!(small.get(index), big.get(index), "get({index})");
        assert_eq!(
            small.lower_bound(index),
            big.lower_bound(index),
            "lower_bound({index})"
        );
    }
    assert_eq!(small.find(IndexRange::new(4, 8)), Some(&1));
    assert_eq!(big.find(IndexRange::new(4, 8)), Some(&1));
    assert_eq!(small.find(IndexRange::new(4, 7)), None);
    assert_eq!(big.find(IndexRange::new(4, 7)), None);
}

#[test]
fn iter_from_starts_at_containing_entry() {
    let mut tree = TreeIntervalMap::new();
    tree.insert(IndexRange::new(0, 10), 7_u32);
    tree.insert(IndexRange::new(10, 20), 8);
    let firsts: Vec<_> = tree.iter_from(15).map(|(r, _)| r.begin).collect();
    assert_eq!(firsts, [10]);
}

#[test]
fn array_backing_stays_inline_within_its_domain() {
    let mut map = ArrayIntervalMap::<u32, 8>::new(8);
    for i in 0..8 {
        map.insert(IndexRange::new(i, i + 1), 0);
    }
    assert_eq!(map.len(), 8);
    assert!(!map.spilled());
}

#[test]
fn clear_empties_every_mode() {
    let mut small = HybridIntervalMap::<u32, 8>::new(8);
    let mut big = HybridIntervalMap::<u32, 8>::new(64);
    small.insert(IndexRange::new(0, 8), 1);
    big.insert(IndexRange::new(0, 64), 1);
    small.clear();
    big.clear();
    assert!(small.is_empty());
    assert!(big.is_empty());
}

#[test]
fn both_modes_share_the_domain_limit() {
    let small = HybridIntervalMap::<u32, 16>::new(8);
    let big = HybridIntervalMap::<u32, 4>::new(8);
    assert!(small.is_small() && big.is_big());
    assert_eq!(small.limit(), big.limit());

    fn check<const N: usize>(mut map: HybridIntervalMap<u32, N>) {
        let mode = map.mode();
        map.overwrite_range(IndexRange::new(6, 8), 1);
        let past_end = std::panic::catch_unwind(move || {
            map.overwrite_range(IndexRange::new(6, 100), 1);
        });
        assert!(
            past_end.is_err(),
            "{mode:?} map accepted a key past its limit"
        );
    }
    check(small);
    check(big);
}
