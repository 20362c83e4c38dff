//! Benchmarks for blockhash.
//!
//! Run with:
//!     cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::io::Cursor;

use blockhash::{Algorithm, BlockConfig, BlockReader, DigestPipeline, DrainPolicy};

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let size = 16 * 1024 * 1024;
    // Deterministic pseudo-random data
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();
    group.throughput(Throughput::Bytes(size as u64));

    for workers in [1, 4, 0] {
        let config = BlockConfig::from_mib(1).unwrap().with_workers(workers);
        let pipeline = DigestPipeline::new(config).unwrap();
        group.bench_function(format!("md5_1mib_workers_{workers}"), |b| {
            b.iter(|| {
                let summary = pipeline
                    .run(Cursor::new(black_box(&data)), std::io::sink())
                    .unwrap();
                black_box(summary.blocks)
            });
        });
    }

    group.finish();
}

fn bench_configs(c: &mut Criterion) {
    let mut group = c.benchmark_group("configs");
    let size = 8 * 1024 * 1024;
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();
    group.throughput(Throughput::Bytes(size as u64));

    let cases = [
        ("small_blocks", BlockConfig::new(64 * 1024).unwrap()),
        ("default_blocks", BlockConfig::default()),
        (
            "single_drain",
            BlockConfig::default().with_drain(DrainPolicy::Single),
        ),
        (
            "bounded_in_flight",
            BlockConfig::default().with_max_in_flight(Some(4)),
        ),
        (
            "sha256",
            BlockConfig::default().with_algorithm(Algorithm::Sha256),
        ),
    ];

    for (name, config) in cases {
        let pipeline = DigestPipeline::new(config).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| {
                let digests = pipeline.digest_all(Cursor::new(black_box(&data))).unwrap();
                black_box(digests.len())
            });
        });
    }

    group.finish();
}

fn bench_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader");
    let size = 8 * 1024 * 1024;
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("blocks_1mib", |b| {
        let config = BlockConfig::default();
        b.iter(|| {
            let count = BlockReader::new(Cursor::new(black_box(&data)), &config)
                .map(|block| block.unwrap().len())
                .count();
            black_box(count)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_configs, bench_reader);
criterion_main!(benches);
