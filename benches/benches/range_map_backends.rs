// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use understory_range_map::{
    ArrayIntervalMap, IndexRange, IntervalMap, SplitOp, TreeIntervalMap,
};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, upper_exclusive: u64) -> u64 {
        self.next_u64() % upper_exclusive
    }
}

/// Random non-empty ranges inside `[0, limit)`.
fn gen_ranges(n: usize, limit: u64, seed: u64) -> Vec<IndexRange> {
    let mut rng = Rng::new(seed);
    (0..n)
        .map(|_| {
            let begin = rng.below(limit);
            let len = 1 + rng.below((limit - begin).min(8));
            IndexRange::from_len(begin, len)
        })
        .collect()
}

fn overwrite_all<M: IntervalMap<Value = u64>>(map: &mut M, ranges: &[IndexRange]) {
    for (i, range) in ranges.iter().enumerate() {
        map.overwrite_range(*range, i as u64);
    }
}

fn lookup_all<M: IntervalMap<Value = u64>>(map: &M, limit: u64) -> u64 {
    let mut acc = 0;
    for index in 0..limit {
        if let Some((_, value)) = map.lower_bound(black_box(index)) {
            acc ^= *value;
        }
    }
    acc
}

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_map_backends");
    const LIMIT: u64 = 16;
    let ranges = gen_ranges(64, LIMIT, 0x9E37_79B9_7F4A_7C15);

    group.bench_function(BenchmarkId::new("overwrite", "array"), |b| {
        b.iter_batched(
            || ArrayIntervalMap::<u64, 16>::new(LIMIT),
            |mut map| {
                overwrite_all(&mut map, &ranges);
                black_box(map.len())
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function(BenchmarkId::new("overwrite", "tree"), |b| {
        b.iter_batched(
            TreeIntervalMap::<u64>::new,
            |mut map| {
                overwrite_all(&mut map, &ranges);
                black_box(map.len())
            },
            BatchSize::SmallInput,
        );
    });

    let mut array = ArrayIntervalMap::<u64, 16>::new(LIMIT);
    let mut tree = TreeIntervalMap::new();
    overwrite_all(&mut array, &ranges);
    overwrite_all(&mut tree, &ranges);
    group.bench_function(BenchmarkId::new("lower_bound", "array"), |b| {
        b.iter(|| lookup_all(&array, LIMIT));
    });
    group.bench_function(BenchmarkId::new("lower_bound", "tree"), |b| {
        b.iter(|| lookup_all(&tree, LIMIT));
    });

    group.bench_function(BenchmarkId::new("split", "tree"), |b| {
        b.iter_batched(
            || tree.clone(),
            |mut map| {
                for index in 0..LIMIT {
                    map.split(index, SplitOp::KeepBoth);
                }
                black_box(map.len())
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_backends);
criterion_main!(benches);
