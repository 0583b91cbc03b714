use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seqlinq::prelude::*;

fn make_rows(n: usize) -> Vec<(u32, String, f64)> {
    (0..n)
        .map(|i| {
            (
                (i % 97) as u32,
                format!("group-{}", i % 16),
                ((i * 7) % 1000) as f64 / 10.0,
            )
        })
        .collect()
}

fn bench_streaming_chain(c: &mut Criterion) {
    c.bench_function("where_select_take", |b| {
        b.iter(|| {
            let out = (0..100_000u64)
                .query()
                .where_by(|x| x % 3 == 0)
                .select(|x| x * 2)
                .take(10_000)
                .and_then(|q| q.sum())
                .unwrap();
            black_box(out)
        })
    });
}

fn bench_order_by_then_by(c: &mut Criterion) {
    let rows = make_rows(10_000);
    c.bench_function("order_by_then_by", |b| {
        b.iter(|| {
            let out = rows
                .iter()
                .query()
                .order_by(|r: &&(u32, String, f64)| r.0)
                .then_by_descending(|r: &&(u32, String, f64)| r.2)
                .count()
                .unwrap();
            black_box(out)
        })
    });
}

fn bench_group_by(c: &mut Criterion) {
    let rows = make_rows(10_000);
    c.bench_function("group_by_sum", |b| {
        b.iter(|| {
            let out = rows
                .iter()
                .query()
                .group_by(|r: &&(u32, String, f64)| r.1.clone())
                .select(|g| g.iter().map(|r| r.2).sum::<f64>())
                .to_list()
                .unwrap();
            black_box(out)
        })
    });
}

fn bench_join(c: &mut Criterion) {
    let outer: Vec<u32> = (0..5_000).collect();
    let inner: Vec<(u32, u32)> = (0..5_000).map(|i| (i % 500, i)).collect();
    c.bench_function("hash_join", |b| {
        b.iter(|| {
            let out = outer
                .iter()
                .copied()
                .query()
                .join(inner.iter().copied(), |o: &u32| *o, |i: &(u32, u32)| i.0)
                .count()
                .unwrap();
            black_box(out)
        })
    });
}

criterion_group!(
    benches,
    bench_streaming_chain,
    bench_order_by_then_by,
    bench_group_by,
    bench_join
);
criterion_main!(benches);
