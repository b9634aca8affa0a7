//! Criterion benchmarks for datacache: raw generation, JSON encoding, memoized hit.

use std::sync::Arc;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use datacache_cache::MemoryStore;
use datacache_core::DEFAULT_CACHE_KEY;
use datacache_generator::{build_record, generate_envelope, GeneratorConfig, MemoizedGenerator};

fn bench_build_record(c: &mut Criterion) {
    let now = Utc::now();
    let mut g = c.benchmark_group("record");
    g.throughput(Throughput::Elements(1));
    g.bench_function("build_record", |b| {
        b.iter(|| black_box(build_record(black_box(999), now)));
    });
    g.finish();
}

fn bench_generate_envelope(c: &mut Criterion) {
    let mut g = c.benchmark_group("envelope");
    g.throughput(Throughput::Elements(1000));
    g.bench_function("generate_envelope", |b| {
        b.iter(|| black_box(generate_envelope(Utc::now(), DEFAULT_CACHE_KEY, 300)));
    });
    g.bench_function("encode_json", |b| {
        let envelope = generate_envelope(Utc::now(), DEFAULT_CACHE_KEY, 300);
        b.iter(|| black_box(serde_json::to_vec(&envelope)).unwrap());
    });
    g.finish();
}

fn bench_memoized_hit(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let generator = MemoizedGenerator::new(Arc::new(MemoryStore::new()), GeneratorConfig::default());
    rt.block_on(generator.fetch_or_generate()).unwrap();

    let mut g = c.benchmark_group("memoized");
    g.throughput(Throughput::Elements(1));
    g.bench_function("fetch_or_generate_hit", |b| {
        b.iter(|| black_box(rt.block_on(generator.fetch_or_generate())).unwrap());
    });
    g.finish();
}

criterion_group!(benches, bench_build_record, bench_generate_envelope, bench_memoized_hit);
criterion_main!(benches);
