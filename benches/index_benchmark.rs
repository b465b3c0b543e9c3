use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use wordex::core::config::{HashFunction, HashTableConfig, IndexConfig};
use wordex::index::avl_index::AvlIndex;
use wordex::index::hash_index::HashIndex;
use wordex::index::shared::SharedIndex;
use wordex::index::word_index::Index;

/// Helper to create a reproducible stream of (word, doc) occurrences
fn create_occurrences(count: usize, vocabulary: usize) -> Vec<(String, String)> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let word = format!("word{}", rng.gen_range(0..vocabulary));
            let doc = format!("doc{}", rng.gen_range(0..64));
            (word, doc)
        })
        .collect()
}

fn fill<I: Index>(index: &mut I, occurrences: &[(String, String)]) {
    for (word, doc) in occurrences {
        index.add(word, doc).unwrap();
    }
}

/// Benchmark ingestion into both backing structures
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000usize, 10_000, 50_000].iter() {
        let occurrences = create_occurrences(*size, size / 4);

        group.bench_with_input(BenchmarkId::new("avl", size), &occurrences, |b, occ| {
            b.iter(|| {
                let mut index = AvlIndex::new();
                fill(&mut index, occ);
                black_box(index.size())
            });
        });

        group.bench_with_input(BenchmarkId::new("hash", size), &occurrences, |b, occ| {
            b.iter(|| {
                let mut index = HashIndex::new();
                fill(&mut index, occ);
                black_box(index.size())
            });
        });
    }

    group.finish();
}

/// Benchmark lookups of present and absent words
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let occurrences = create_occurrences(20_000, 5_000);

    let mut avl = AvlIndex::new();
    fill(&mut avl, &occurrences);
    let mut hash = HashIndex::new();
    fill(&mut hash, &occurrences);

    let probes: Vec<String> = (0..1_000).map(|i| format!("word{}", i * 7)).collect();

    group.bench_function("avl", |b| {
        b.iter(|| {
            let mut found = 0;
            for probe in &probes {
                if avl.lookup(probe).is_ok() {
                    found += 1;
                }
            }
            black_box(found)
        });
    });

    group.bench_function("hash", |b| {
        b.iter(|| {
            let mut found = 0;
            for probe in &probes {
                if hash.lookup(probe).is_ok() {
                    found += 1;
                }
            }
            black_box(found)
        });
    });

    group.finish();
}

/// Benchmark the two hash functions on the same workload
fn bench_hash_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_function");
    let occurrences = create_occurrences(10_000, 2_500);

    for function in [HashFunction::Djb2, HashFunction::Crc32] {
        let config = IndexConfig {
            table: HashTableConfig {
                hash_function: function,
                ..HashTableConfig::default()
            },
            ..IndexConfig::default()
        };
        group.bench_function(format!("{:?}", function), |b| {
            b.iter(|| {
                let mut index = HashIndex::with_config(config.clone()).unwrap();
                fill(&mut index, &occurrences);
                black_box(index.rehash_count())
            });
        });
    }

    group.finish();
}

/// Benchmark batched ingestion through the shared handle
fn bench_shared_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_batch");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));

    let occurrences = create_occurrences(10_000, 2_500);

    group.bench_function("avl_add_batch", |b| {
        b.iter(|| {
            let shared = SharedIndex::new(AvlIndex::new());
            let applied = shared
                .add_batch(occurrences.iter().map(|(w, d)| (w.as_str(), d.as_str(), 1)))
                .unwrap();
            black_box(applied)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_lookup,
    bench_hash_functions,
    bench_shared_batch
);
criterion_main!(benches);
