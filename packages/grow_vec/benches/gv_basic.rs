//! Basic benchmarks for the `grow_vec` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use grow_vec::GrowVec;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

type TestItem = usize;
const TEST_VALUE: TestItem = 1024;
const GROW_TARGET: usize = 1024;

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("gv_basic");

    let allocs_op = allocs.operation("build_empty");
    group.bench_function("build_empty", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(GrowVec::<TestItem>::new()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("push_first");
    group.bench_function("push_first", |b| {
        b.iter_custom(|iters| {
            let mut vecs = iter::repeat_with(GrowVec::<TestItem>::new)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vec in &mut vecs {
                _ = black_box(vec.push(black_box(TEST_VALUE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("push_preallocated");
    group.bench_function("push_preallocated", |b| {
        b.iter_custom(|iters| {
            let mut vecs = iter::repeat_with(|| {
                let mut vec = GrowVec::<TestItem>::new();
                vec.reserve(1);
                vec
            })
            .take(usize::try_from(iters).unwrap())
            .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vec in &mut vecs {
                _ = black_box(vec.push(black_box(TEST_VALUE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("grow_1024");
    group.bench_function("grow_1024", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let mut vec = GrowVec::<TestItem>::new();

                for _ in 0..GROW_TARGET {
                    _ = vec.push(black_box(TEST_VALUE));
                }

                drop(black_box(vec));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("clone_1024");
    group.bench_function("clone_1024", |b| {
        b.iter_custom(|iters| {
            let mut vec = GrowVec::<TestItem>::new();
            for _ in 0..GROW_TARGET {
                _ = vec.push(TEST_VALUE);
            }

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(vec.clone()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("insert_mid");
    group.bench_function("insert_mid", |b| {
        b.iter_custom(|iters| {
            let mut vecs = iter::repeat_with(|| {
                let mut vec = GrowVec::<TestItem>::new();
                vec.reserve(GROW_TARGET.checked_add(1).unwrap());
                for _ in 0..GROW_TARGET {
                    _ = vec.push(TEST_VALUE);
                }
                vec
            })
            .take(usize::try_from(iters).unwrap())
            .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vec in &mut vecs {
                _ = black_box(vec.insert(black_box(GROW_TARGET / 2), black_box(TEST_VALUE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("remove_mid");
    group.bench_function("remove_mid", |b| {
        b.iter_custom(|iters| {
            let mut vecs = iter::repeat_with(|| {
                let mut vec = GrowVec::<TestItem>::new();
                for _ in 0..GROW_TARGET {
                    _ = vec.push(TEST_VALUE);
                }
                vec
            })
            .take(usize::try_from(iters).unwrap())
            .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vec in &mut vecs {
                _ = black_box(vec.remove(black_box(GROW_TARGET / 2)));
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
