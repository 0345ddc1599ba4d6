//! Basic benchmarks for the `dynamic_array` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::time::Instant;

use criterion::{Criterion, criterion_group, criterion_main};
use dynamic_array::DynamicArray;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

type TestItem = u64;
const TEST_VALUE: TestItem = 1024;
const FILL_LEN: usize = 1000;

fn filled(len: usize) -> DynamicArray<TestItem> {
    let mut array = DynamicArray::new();
    array.reserve(len).unwrap();
    for index in 0..len {
        array.push_back(TestItem::try_from(index).unwrap()).unwrap();
    }
    array
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("da_basic");

    group.bench_function("build_empty", |b| {
        b.iter(|| drop(black_box(DynamicArray::<TestItem>::new())));
    });

    group.bench_function("push_back_growing", |b| {
        b.iter(|| {
            let mut array = DynamicArray::new();
            for _ in 0..FILL_LEN {
                array.push_back(black_box(TEST_VALUE)).unwrap();
            }
            black_box(&array);
        });
    });

    group.bench_function("push_back_preallocated", |b| {
        b.iter(|| {
            let mut array = DynamicArray::new();
            array.reserve(FILL_LEN).unwrap();
            for _ in 0..FILL_LEN {
                array.push_back(black_box(TEST_VALUE)).unwrap();
            }
            black_box(&array);
        });
    });

    group.bench_function("with_len", |b| {
        b.iter(|| drop(black_box(DynamicArray::<TestItem>::with_len(FILL_LEN).unwrap())));
    });

    group.bench_function("duplicate", |b| {
        let array = filled(FILL_LEN);

        b.iter(|| drop(black_box(array.duplicate().unwrap())));
    });

    group.bench_function("iterate_sum", |b| {
        let array = filled(FILL_LEN);

        b.iter(|| black_box(array.iter().sum::<TestItem>()));
    });

    group.bench_function("insert_front", |b| {
        b.iter_custom(|iters| {
            let mut array = filled(FILL_LEN);
            array.reserve(FILL_LEN + usize::try_from(iters).unwrap()).unwrap();

            let start = Instant::now();

            for _ in 0..iters {
                _ = black_box(array.insert(0, black_box(TEST_VALUE)).unwrap());
            }

            start.elapsed()
        });
    });

    group.bench_function("erase_front", |b| {
        b.iter_custom(|iters| {
            let mut array = filled(usize::try_from(iters).unwrap());

            let start = Instant::now();

            for _ in 0..iters {
                array.erase(0).unwrap();
            }

            start.elapsed()
        });
    });

    group.finish();
}
