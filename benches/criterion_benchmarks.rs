use criterion::{black_box, criterion_group, criterion_main, Criterion};
use policy_cache::{Cache, CacheConfig, PolicyKind};
use std::sync::Arc;
use std::thread;

const CACHE_SIZE: usize = 1000;

fn make_cache(policy: PolicyKind) -> Cache<usize, usize> {
    let config = CacheConfig {
        capacity: CACHE_SIZE,
        policy,
    };
    Cache::init(config).unwrap()
}

fn make_full_cache(policy: PolicyKind) -> Cache<usize, usize> {
    let cache = make_cache(policy);
    for i in 0..CACHE_SIZE {
        cache.put(i, i).unwrap();
    }
    cache
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cache Operations");

    for policy in PolicyKind::ALL {
        let cache = make_full_cache(policy);

        group.bench_function(format!("{policy} get hit"), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function(format!("{policy} get miss"), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i + CACHE_SIZE)));
                }
            });
        });

        group.bench_function(format!("{policy} put existing"), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.put(i % CACHE_SIZE, i).unwrap());
                }
            });
        });

        // every put of a fresh key evicts
        let mut next = CACHE_SIZE;
        group.bench_function(format!("{policy} put evicting"), |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.put(next, next).unwrap());
                    next += 1;
                }
            });
        });

        group.bench_function(format!("{policy} remove and reinsert"), |b| {
            let cache = make_full_cache(policy);
            b.iter(|| {
                for i in 0..100 {
                    cache.remove(&i);
                    cache.put(i, i).unwrap();
                }
            });
        });
    }

    group.finish();
}

pub fn concurrent_benchmark(c: &mut Criterion) {
    const THREADS: usize = 4;
    let mut group = c.benchmark_group("Shared Cache");

    for policy in PolicyKind::ALL {
        let cache = Arc::new(make_full_cache(policy));

        group.bench_function(format!("{policy} mixed {THREADS} threads"), |b| {
            b.iter(|| {
                let handles: Vec<_> = (0..THREADS)
                    .map(|t| {
                        let cache = Arc::clone(&cache);
                        thread::spawn(move || {
                            for i in 0..250 {
                                let key = (t * 997 + i * 31) % (CACHE_SIZE * 2);
                                if i % 4 == 0 {
                                    cache.put(key, i).unwrap();
                                } else {
                                    black_box(cache.get(&key));
                                }
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark, concurrent_benchmark);
criterion_main!(benches);
