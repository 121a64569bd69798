// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for notification lifecycle operations.
//!
//! Measures the performance of:
//! - Pushing into a full queue (eviction on every push)
//! - Ticking a full queue through expiry and exit
//! - Raw scheduler polling with many pending timers

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use std::time::{Duration, Instant};
use toastline::notifications::{Scheduler, TimerPurpose};
use toastline::{Config, ManualClock, Manager, Notification};

fn manual_manager() -> (Manager, ManualClock) {
    let clock = ManualClock::new();
    let manager = Manager::with_clock(Config::default(), Arc::new(clock.clone()));
    (manager, clock)
}

/// Every push after the fifth evicts the oldest record.
fn bench_push_with_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("notifications");

    group.bench_function("push_evict", |b| {
        let (mut manager, _clock) = manual_manager();
        for n in 0..5 {
            manager.push(Notification::info(format!("warm-{n}")));
        }
        b.iter(|| {
            let id = manager.push(Notification::success("Saved"));
            black_box(id);
        });
    });

    group.finish();
}

/// Fills the queue, then ticks it until empty at the progress interval.
fn bench_tick_to_empty(c: &mut Criterion) {
    let mut group = c.benchmark_group("notifications");

    group.bench_function("tick_to_empty", |b| {
        b.iter(|| {
            let (mut manager, clock) = manual_manager();
            for n in 0..5 {
                manager.push(Notification::success(format!("n{n}")));
            }
            while !manager.is_empty() {
                clock.advance(Duration::from_millis(50));
                manager.tick();
            }
            black_box(manager.len());
        });
    });

    group.finish();
}

/// Start 1000 timers and poll them all due.
fn bench_scheduler_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("timer");

    group.bench_function("poll_1000", |b| {
        let key = Manager::new().push(Notification::info("timer key"));
        b.iter(|| {
            let mut scheduler = Scheduler::new();
            let t0 = Instant::now();
            for n in 0..1_000u64 {
                scheduler.start(
                    key,
                    TimerPurpose::AutoDismiss,
                    Duration::from_millis(n),
                    t0,
                );
            }
            black_box(scheduler.poll(t0 + Duration::from_secs(1)));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_push_with_eviction,
    bench_tick_to_empty,
    bench_scheduler_poll
);
criterion_main!(benches);
