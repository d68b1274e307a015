//! Context operation benchmarks
//!
//! Each operation is measured against contexts carrying 1, 10 and 100 keys
//! in every store, built the way a request handler would build them: one
//! write per key.

use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hopmeta_context::Context;

const SIZES: [usize; 3] = [1, 10, 100];

fn build(count: usize) -> (Context, Vec<String>, HashMap<String, String>) {
    let mut ctx = Context::background()
        .with_backward_values()
        .with_backward_values_to_send();
    let mut keys = Vec::with_capacity(count);
    let mut map = HashMap::with_capacity(count);
    for i in 0..count {
        let (k, v) = (format!("key-{i}"), format!("val-{i}"));
        ctx = ctx.with_value(k.as_str(), v.as_str());
        ctx = ctx.with_persistent_value(k.as_str(), v.as_str());
        ctx.set_backward_value(k.as_str(), v.as_str());
        ctx.send_backward_value(k.as_str(), v.as_str());
        keys.push(k.clone());
        map.insert(k, v);
    }
    (ctx, keys, map)
}

fn bench_transit(c: &mut Criterion) {
    let mut group = c.benchmark_group("transit");
    for size in SIZES {
        let (ctx, keys, _) = build(size);
        group.bench_with_input(BenchmarkId::new("get_value", size), &size, |b, _| {
            let mut i = 0;
            b.iter(|| {
                i += 1;
                black_box(ctx.get_value(&keys[i % keys.len()]).is_some())
            })
        });
        group.bench_with_input(BenchmarkId::new("get_all_values", size), &size, |b, _| {
            b.iter(|| black_box(ctx.get_all_values()))
        });
        group.bench_with_input(BenchmarkId::new("range_values", size), &size, |b, _| {
            b.iter(|| ctx.range_values(|k, v| black_box(!k.is_empty() && !v.is_empty())))
        });
        group.bench_with_input(BenchmarkId::new("with_value", size), &size, |b, _| {
            b.iter(|| black_box(ctx.with_value("key", "val")))
        });
        group.bench_with_input(BenchmarkId::new("del_value", size), &size, |b, _| {
            b.iter(|| black_box(ctx.del_value("key")))
        });
        group.bench_with_input(BenchmarkId::new("transfer_forward", size), &size, |b, _| {
            b.iter(|| black_box(ctx.transfer_forward()))
        });
    }
    group.finish();
}

fn bench_persistent(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistent");
    for size in SIZES {
        let (ctx, keys, _) = build(size);
        group.bench_with_input(
            BenchmarkId::new("get_persistent_value", size),
            &size,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    i += 1;
                    black_box(ctx.get_persistent_value(&keys[i % keys.len()]).is_some())
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("get_all_persistent_values", size),
            &size,
            |b, _| b.iter(|| black_box(ctx.get_all_persistent_values())),
        );
        group.bench_with_input(
            BenchmarkId::new("with_persistent_value", size),
            &size,
            |b, _| b.iter(|| black_box(ctx.with_persistent_value("key", "val"))),
        );
    }
    group.finish();
}

fn bench_backward(c: &mut Criterion) {
    let mut group = c.benchmark_group("backward");
    for size in SIZES {
        let (ctx, keys, map) = build(size);
        let key = &keys[size / 2];
        group.bench_with_input(BenchmarkId::new("recv_backward_value", size), &size, |b, _| {
            b.iter(|| black_box(ctx.recv_backward_value(key)))
        });
        group.bench_with_input(
            BenchmarkId::new("all_backward_values_to_send", size),
            &size,
            |b, _| b.iter(|| black_box(ctx.all_backward_values_to_send())),
        );
        group.bench_with_input(BenchmarkId::new("send_backward_value", size), &size, |b, _| {
            b.iter(|| black_box(ctx.send_backward_value(key.as_str(), "val")))
        });
        group.bench_with_input(
            BenchmarkId::new("set_backward_values_from_map", size),
            &size,
            |b, _| {
                b.iter(|| {
                    let fresh = Context::background().with_backward_values();
                    black_box(fresh.set_backward_values_from_map(&map))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_transit, bench_persistent, bench_backward);
criterion_main!(benches);
