//! Benchmark: index build and per-slide selection cost.
//!
//! Run with: `cargo bench -p timeslide-core --bench selector_bench`
//!
//! A slide event rebuilds nothing but re-runs the selector, so selection
//! latency at realistic marker counts is the number that matters for
//! drag smoothness. Build cost is paid once per attach.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use timeslide_core::index::{IndexOptions, MarkerIndex};
use timeslide_core::item::{Marker, Node};
use timeslide_core::selector::{DisplayMode, Selection, SliderBounds, select_positions};

fn nodes(n: usize) -> Vec<Node<Marker>> {
    // Deterministic shuffle of years with some duplicates and gaps.
    (0..n)
        .map(|i| {
            let year = 1900 + (i * 7919) % 120;
            let m = Marker::new(i as u64).at(i as f64 * 0.01, i as f64 * -0.01);
            let m = if i % 50 == 0 {
                m
            } else {
                m.property("time", format!("{year}-06-01"))
            };
            Node::leaf(m)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");
    for n in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || nodes(n),
                |nodes| black_box(MarkerIndex::build(nodes, IndexOptions::default())),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let index = MarkerIndex::build(nodes(10_000), IndexOptions::default());
    let bounds = SliderBounds::for_len(index.len());
    let current = Selection::Single(index.len() / 2);

    let mut group = c.benchmark_group("select_10k");
    for (name, mode) in [
        ("cumulative", DisplayMode::Cumulative),
        ("trailing_25", DisplayMode::trailing(25).unwrap_or_default()),
        ("same_instant", DisplayMode::SameInstant),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(select_positions(&index, current, mode, bounds)));
        });
    }
    group.bench_function("range", |b| {
        let sel = Selection::range(2_000, 7_000);
        b.iter(|| black_box(select_positions(&index, sel, DisplayMode::Range, bounds)));
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_select);
criterion_main!(benches);
