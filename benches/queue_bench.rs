//! Benchmarks for the priority task queue and pool submission path.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;

use priolane::config::PoolConfig;
use priolane::core::{Pool, PriorityQueue};

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_enqueue");
    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let queue = PriorityQueue::new();
                for priority in 0..size as u32 {
                    queue.enqueue(Box::new(|| {}), black_box(priority));
                }
            });
        });
    }
    group.finish();
}

fn bench_enqueue_dequeue_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_enqueue_dequeue");
    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let queue = PriorityQueue::new();
                for priority in 0..size as u32 {
                    queue.enqueue(Box::new(|| {}), priority);
                }
                while let Some((task, priority)) = queue.try_dequeue() {
                    black_box(priority);
                    task();
                }
            });
        });
    }
    group.finish();
}

fn bench_concurrent_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_concurrent_enqueue");
    for producers in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(producers), &producers, |b, &producers| {
            b.iter(|| {
                let queue = Arc::new(PriorityQueue::new());
                let handles: Vec<_> = (0..producers)
                    .map(|_| {
                        let queue = Arc::clone(&queue);
                        std::thread::spawn(move || {
                            for priority in 0..100u32 {
                                queue.enqueue(Box::new(|| {}), priority);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
                black_box(queue.len());
            });
        });
    }
    group.finish();
}

fn bench_pool_submit_fixed(c: &mut Criterion) {
    c.bench_function("pool_submit_fixed_4", |b| {
        let pool = Pool::new(PoolConfig::fixed(4), None).expect("pool starts");
        b.iter(|| {
            let handle = pool.submit(|| 1 + 1, None).expect("submit accepted");
            black_box(handle.wait().unwrap());
        });
        pool.close();
    });
}

criterion_group!(
    benches,
    bench_enqueue,
    bench_enqueue_dequeue_cycle,
    bench_concurrent_enqueue,
    bench_pool_submit_fixed
);
criterion_main!(benches);
