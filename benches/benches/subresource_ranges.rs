// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_subresource::{
    AspectFlags, Extent3D, IndexRange, IntervalMap, MapView, Offset3D, OffsetRangeEncoder,
    OffsetRangeGenerator, RangeEncoder, RangeGenerator, SubresourceCursor, SubresourceMap,
    SubresourceRange,
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

    fn below(&mut self, upper_exclusive: u32) -> u32 {
        (self.next_u64() % u64::from(upper_exclusive)) as u32
    }

    /// A random non-empty `(base, count)` span of `0..limit`.
    fn span(&mut self, limit: u32) -> (u32, u32) {
        let base = self.below(limit);
        (base, 1 + self.below(limit - base))
    }
}

fn random_selections(encoder: &RangeEncoder, n: usize, seed: u64) -> Vec<SubresourceRange> {
    let mut rng = Rng::new(seed);
    let limits = *encoder.limits();
    (0..n)
        .map(|_| {
            let aspect = encoder.aspect_bit(rng.below(encoder.aspect_count()));
            let (base_mip, mips) = rng.span(limits.mip_level);
            let (base_layer, layers) = rng.span(limits.array_layer);
            SubresourceRange::new(aspect, base_mip, mips, base_layer, layers)
        })
        .collect()
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("subresource_encoding");
    for (name, mask) in [
        ("color", AspectFlags::COLOR),
        ("depth_stencil", AspectFlags::DEPTH | AspectFlags::STENCIL),
        (
            "three_plane",
            AspectFlags::PLANE_0 | AspectFlags::PLANE_1 | AspectFlags::PLANE_2,
        ),
    ] {
        let encoder = RangeEncoder::new(SubresourceRange::full(mask, 12, 16));
        let count = encoder.subresource_count();
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("decode_encode", name), &encoder, |b, e| {
            b.iter(|| {
                let mut acc = 0_u64;
                for index in 0..count {
                    acc ^= e.encode(&e.decode(black_box(index)));
                }
                black_box(acc)
            });
        });
        group.bench_with_input(BenchmarkId::new("cursor_walk", name), &encoder, |b, e| {
            b.iter(|| {
                SubresourceCursor::new(e, *e.full_range())
                    .map(|s| u64::from(s.array_layer))
                    .sum::<u64>()
            });
        });
    }
    group.finish();
}

fn bench_generators(c: &mut Criterion) {
    let mut group = c.benchmark_group("subresource_ranges");
    let encoder = RangeEncoder::new(SubresourceRange::full(
        AspectFlags::DEPTH | AspectFlags::STENCIL,
        12,
        64,
    ));
    let selections = random_selections(&encoder, 256, 0x5eed);
    group.throughput(Throughput::Elements(selections.len() as u64));
    group.bench_function("range_generator(random)", |b| {
        b.iter(|| {
            let mut ranges = 0_usize;
            for selection in &selections {
                ranges += RangeGenerator::new(&encoder, black_box(*selection)).count();
            }
            black_box(ranges)
        });
    });

    let offsets = OffsetRangeEncoder::new(
        SubresourceRange::full(AspectFlags::COLOR, 4, 4),
        Extent3D::new(64, 64, 1),
    );
    for (name, offset, extent) in [
        ("full_rows", Offset3D::new(0, 8, 0), Extent3D::new(64, 16, 1)),
        ("partial_rows", Offset3D::new(8, 8, 0), Extent3D::new(32, 16, 1)),
    ] {
        group.bench_function(format!("offset_generator({name})"), |b| {
            b.iter(|| {
                OffsetRangeGenerator::new(
                    &offsets,
                    *offsets.base().full_range(),
                    black_box(offset),
                    extent,
                )
                .count()
            });
        });
    }
    group.finish();
}

fn bench_map_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_view");
    let encoder = RangeEncoder::new(SubresourceRange::full(AspectFlags::COLOR, 12, 64));
    let count = encoder.subresource_count();
    for runs in [1_u64, 16, 256] {
        let mut map = SubresourceMap::new(count);
        let run = count / runs;
        for i in 0..runs {
            map.overwrite_range(IndexRange::from_len(i * run, run / 2 + 1), i);
        }
        let view = MapView::new(&map, &encoder);
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("iter_full", runs), &view, |b, view| {
            b.iter(|| view.iter_full().map(|item| *item.value).sum::<u64>());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encoding, bench_generators, bench_map_view);
criterion_main!(benches);
