//! Benchmarks for trie operations.

use cow_trie::Trie;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_sequential_keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("key:{:08}", i)).collect()
}

fn generate_url_like_keys(n: usize) -> Vec<String> {
    let domains = ["example.com", "test.org", "demo.net", "sample.io"];
    let paths = ["users", "posts", "comments", "api/v1", "api/v2"];

    (0..n)
        .map(|i| {
            let domain = domains[i % domains.len()];
            let path = paths[(i / domains.len()) % paths.len()];
            let id = i / (domains.len() * paths.len());
            format!("{}/{}/{}", domain, path, id)
        })
        .collect()
}

fn build(keys: &[String]) -> Trie {
    keys.iter()
        .enumerate()
        .fold(Trie::new(), |trie, (i, key)| trie.put(key, i as u64))
}

fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("put");

    for size in [1_000, 10_000].iter() {
        let keys = generate_sequential_keys(*size);
        group.bench_with_input(BenchmarkId::new("sequential", size), &keys, |b, keys| {
            b.iter(|| black_box(build(keys)));
        });

        let keys = generate_url_like_keys(*size);
        group.bench_with_input(BenchmarkId::new("url_like", size), &keys, |b, keys| {
            b.iter(|| black_box(build(keys)));
        });
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for size in [1_000, 10_000].iter() {
        let keys = generate_url_like_keys(*size);
        let trie = build(&keys);
        let mut rng = StdRng::seed_from_u64(42);
        let lookups: Vec<&String> = (0..1_000).map(|_| &keys[rng.gen_range(0..keys.len())]).collect();

        group.bench_with_input(BenchmarkId::new("hit", size), &lookups, |b, lookups| {
            b.iter(|| {
                for key in lookups {
                    black_box(trie.get::<u64>(key));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("wrong_type", size), &lookups, |b, lookups| {
            b.iter(|| {
                for key in lookups {
                    black_box(trie.get::<u32>(key));
                }
            });
        });
    }

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for size in [1_000, 10_000].iter() {
        let keys = generate_url_like_keys(*size);
        let trie = build(&keys);

        group.bench_with_input(BenchmarkId::new("first_100", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys.iter().take(100) {
                    black_box(trie.remove(key));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_put, bench_get, bench_remove);
criterion_main!(benches);
