// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Named mutex benchmarks.
//
// Run with:
//   cargo bench --bench named_mutex
//
// Groups:
//   open_close     — open (with its opportunistic acquire) + close
//   wait_release   — uncontended wait_one / release cycle on one handle
//   timed_contended — wait_one_timeout(0) against a handle held on this thread

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use named_mutex::{MutexOptions, NamedMutex};

fn options(dir: &tempfile::TempDir) -> MutexOptions {
    MutexOptions::new().with_lock_dir(dir.path())
}

fn bench_open_close(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let opts = options(&dir);
    c.bench_function("open_close", |b| {
        b.iter(|| {
            let mut mtx = NamedMutex::open_with("bench_open_close", &opts).expect("open");
            black_box(mtx.is_owned());
            mtx.close().expect("close");
        });
    });
}

fn bench_wait_release(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut mtx = NamedMutex::open_with("bench_wait_release", &options(&dir)).expect("open");
    mtx.release().expect("release");
    c.bench_function("wait_release", |b| {
        b.iter(|| {
            black_box(mtx.wait_one().expect("wait"));
            mtx.release().expect("release");
        });
    });
}

fn bench_timed_contended(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let opts = options(&dir);
    let _holder = NamedMutex::open_with("bench_timed", &opts).expect("open holder");
    let mut waiter = NamedMutex::open_with("bench_timed", &opts).expect("open waiter");
    c.bench_function("timed_contended", |b| {
        b.iter(|| black_box(waiter.wait_one_timeout(0).expect("wait")));
    });
}

criterion_group!(
    benches,
    bench_open_close,
    bench_wait_release,
    bench_timed_contended
);
criterion_main!(benches);
