// SPDX-License-Identifier: MPL-2.0
//! Time sources for the notification runtime.
//!
//! Every deadline in the crate is computed from a [`Clock`], never from
//! `Instant::now()` directly. Production code uses [`SystemClock`], which
//! follows tokio's clock (and therefore honours paused time in tests);
//! deterministic tests use [`ManualClock`] and advance it explicitly.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A monotonic time source paired with a wall clock for display timestamps.
pub trait Clock: Send + Sync {
    /// Monotonic time used for all deadlines.
    fn now(&self) -> Instant;

    /// Wall-clock time recorded on notifications for display.
    fn wall_now(&self) -> DateTime<Utc>;
}

/// Clock backed by the tokio time driver.
///
/// Outside a runtime (or without paused time) this is the same as the
/// standard library clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn wall_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for simulated time.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to the manager.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<ManualInner>,
}

#[derive(Debug)]
struct ManualInner {
    origin: Instant,
    wall_origin: DateTime<Utc>,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ManualInner {
                origin: Instant::now(),
                wall_origin: Utc::now(),
                offset_nanos: AtomicU64::new(0),
            }),
        }
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.inner.offset_nanos.fetch_add(nanos, Ordering::AcqRel);
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.inner.offset_nanos.load(Ordering::Acquire))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.inner.origin + self.elapsed()
    }

    fn wall_now(&self) -> DateTime<Utc> {
        let offset = chrono::Duration::from_std(self.elapsed()).unwrap_or(chrono::Duration::zero());
        self.inner.wall_origin + offset
    }
}
