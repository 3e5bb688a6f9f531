use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

use leaky_buffer::pool::{Buffer, LeakyBufferPool};

/// Benchmark single-threaded acquire/release cycles
fn bench_acquire_release(c: &mut Criterion) {
    let pool = LeakyBufferPool::new(64, 4096);

    let mut group = c.benchmark_group("acquire_release");
    group.throughput(Throughput::Elements(1));

    group.bench_function("pooled", |b| {
        b.iter(|| {
            let mut buf = pool.acquire();
            buf.extend_from_slice(b"payload");
            pool.release(black_box(buf));
        })
    });

    group.bench_function("lease_guard", |b| {
        b.iter(|| {
            let mut buf = pool.lease();
            buf.extend_from_slice(b"payload");
            black_box(buf.len());
        })
    });

    // Baseline without pooling
    group.bench_function("unpooled_alloc", |b| {
        b.iter(|| {
            let mut buf = Buffer::with_capacity(4096);
            buf.extend_from_slice(b"payload");
            black_box(buf);
        })
    });

    group.finish();
}

/// Benchmark the replacement path for buffers grown past the allocation size
fn bench_oversized_release(c: &mut Criterion) {
    let pool = LeakyBufferPool::new(64, 1024);
    let payload = vec![0u8; 8192];

    let mut group = c.benchmark_group("oversized_release");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    group.bench_function("grow_and_replace", |b| {
        b.iter(|| {
            let mut buf = pool.acquire();
            buf.extend_from_slice(&payload);
            pool.release(black_box(buf));
        })
    });

    group.finish();
}

/// Benchmark concurrent acquire/release cycles
fn bench_concurrent(c: &mut Criterion) {
    let pool = Arc::new(LeakyBufferPool::new(16, 4096));

    let mut group = c.benchmark_group("concurrent");
    group.throughput(Throughput::Elements(4000));

    // Fewer slots than threads' demand keeps the pool under contention
    group.bench_function("4_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let pool = pool.clone();
                    std::thread::spawn(move || {
                        for _ in 0..1000 {
                            let mut buf = pool.acquire();
                            buf.extend_from_slice(b"payload");
                            pool.release(black_box(buf));
                        }
                    })
                })
                .collect();

            for h in handles {
                h.join().unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_acquire_release,
    bench_oversized_release,
    bench_concurrent,
);
criterion_main!(benches);
