//! Engine benchmarks: full frame trails, not just the tree mutation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use avl_trace::*;

fn build(n: i64) -> Link {
    (0..n).fold(None, |root: Link, v| insert(root.as_deref(), v).final_tree)
}

fn benchmark_engine(c: &mut Criterion) {
    let root = build(255);

    c.bench_function("insert_with_trail_n=255", |b| {
        b.iter(|| black_box(insert(black_box(root.as_deref()), 1_000)));
    });

    c.bench_function("delete_root_with_trail_n=255", |b| {
        let target = root.as_deref().map_or(0, |n| n.value);
        b.iter(|| black_box(delete(black_box(root.as_deref()), target)));
    });

    c.bench_function("layout_n=255", |b| {
        b.iter(|| black_box(calculate_layout(black_box(root.as_deref()))));
    });
}

criterion_group!(benches, benchmark_engine);
criterion_main!(benches);
