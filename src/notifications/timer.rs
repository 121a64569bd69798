// SPDX-License-Identifier: MPL-2.0
//! Cancelable countdowns keyed by notification.
//!
//! The [`Scheduler`] owns no thread. The host polls it with the current time
//! and gets back [`TimerEvent`]s to dispatch, in the same way the manager is
//! driven by `Tick` messages.
//!
//! # Exactly-once
//!
//! Each [`TimerHandle`] shares a small state cell (`Pending`, `Canceled`,
//! `Fired`) with the scheduler. Cancel and fire both compare-and-swap out of
//! `Pending`, so exactly one of them wins. A cancel issued after an expiry
//! was collected by [`Scheduler::poll`] but before it was dispatched still
//! wins, because dispatch must claim the expiry with
//! [`TimerHandle::try_fire`] first.
//!
//! A countdown too long to be represented as an `Instant` never expires; it
//! only leaves the scheduler when canceled.

use super::notification::NotificationId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const PENDING: u8 = 0;
const CANCELED: u8 = 1;
const FIRED: u8 = 2;

/// What a timer is for. Timers with different purposes for the same
/// notification are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    /// Functional countdown, started at push.
    AutoDismiss,
    /// Cosmetic stagger before Entering becomes Visible.
    Enter,
    /// Cosmetic grace between Removing and Removed.
    Exit,
}

/// Handle to a started timer.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: u64,
    key: NotificationId,
    purpose: TimerPurpose,
    state: Arc<AtomicU8>,
}

impl TimerHandle {
    /// Returns the notification this timer belongs to.
    #[must_use]
    pub fn key(&self) -> NotificationId {
        self.key
    }

    /// Returns what the timer is for.
    #[must_use]
    pub fn purpose(&self) -> TimerPurpose {
        self.purpose
    }

    /// Whether the timer was canceled before firing.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELED
    }

    /// Whether the expiry was claimed.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::Acquire) == FIRED
    }

    /// Claims the expiry. Returns `false` if the timer was canceled (or
    /// already fired) in the meantime; the caller must then do nothing.
    pub fn try_fire(&self) -> bool {
        self.transition(FIRED)
    }

    fn try_cancel(&self) -> bool {
        self.transition(CANCELED)
    }

    fn transition(&self, to: u8) -> bool {
        self.state
            .compare_exchange(PENDING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Output of [`Scheduler::poll`].
#[derive(Debug, Clone)]
pub enum TimerEvent {
    /// The countdown elapsed. `deadline` is when it was due, which may be
    /// earlier than the poll time.
    Expired {
        handle: TimerHandle,
        deadline: Instant,
    },
    /// Periodic progress of a pending timer started with
    /// [`Scheduler::start_with_progress`]; 1.0 at start, 0.0 at expiry.
    Progress {
        key: NotificationId,
        remaining_fraction: f32,
    },
}

#[derive(Debug)]
struct Entry {
    handle: TimerHandle,
    started_at: Instant,
    /// `None` when `started_at + duration` overflows.
    deadline: Option<Instant>,
    tick_every: Option<Duration>,
    next_tick: Option<Instant>,
}

impl Entry {
    fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    fn remaining_fraction(&self, now: Instant) -> f32 {
        let Some(deadline) = self.deadline else {
            return 1.0;
        };
        let total = deadline.saturating_duration_since(self.started_at);
        if total.is_zero() {
            return 0.0;
        }
        let left = deadline.saturating_duration_since(now);
        (left.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0) as f32
    }
}

/// Set of pending timers, ordered by start.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: BTreeMap<u64, Entry>,
    next_id: u64,
}

impl Scheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a countdown of `duration` measured from `now`.
    pub fn start(
        &mut self,
        key: NotificationId,
        purpose: TimerPurpose,
        duration: Duration,
        now: Instant,
    ) -> TimerHandle {
        self.insert(key, purpose, duration, None, now)
    }

    /// Starts a countdown that also reports progress every `tick_every`.
    pub fn start_with_progress(
        &mut self,
        key: NotificationId,
        purpose: TimerPurpose,
        duration: Duration,
        tick_every: Duration,
        now: Instant,
    ) -> TimerHandle {
        self.insert(key, purpose, duration, Some(tick_every), now)
    }

    fn insert(
        &mut self,
        key: NotificationId,
        purpose: TimerPurpose,
        duration: Duration,
        tick_every: Option<Duration>,
        now: Instant,
    ) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;

        let handle = TimerHandle {
            id,
            key,
            purpose,
            state: Arc::new(AtomicU8::new(PENDING)),
        };
        let deadline = now.checked_add(duration);
        let tick_every = tick_every
            .filter(|every| !every.is_zero())
            .filter(|_| deadline.is_some());
        self.entries.insert(
            id,
            Entry {
                handle: handle.clone(),
                started_at: now,
                deadline,
                tick_every,
                next_tick: tick_every.and_then(|every| now.checked_add(every)),
            },
        );
        handle
    }

    /// Cancels a timer. Returns `true` if this call prevented the expiry,
    /// `false` if it had already fired or been canceled.
    pub fn cancel(&mut self, handle: &TimerHandle) -> bool {
        self.entries.remove(&handle.id);
        handle.try_cancel()
    }

    /// Cancels every pending timer. Returns how many were prevented.
    pub fn cancel_all(&mut self) -> usize {
        let entries = std::mem::take(&mut self.entries);
        entries
            .into_values()
            .filter(|entry| entry.handle.try_cancel())
            .count()
    }

    /// Collects due expiries (deadline order, then start order) and progress
    /// ticks for the timers still pending at `now`.
    ///
    /// Collected timers leave the scheduler; they fire only if the dispatcher
    /// wins [`TimerHandle::try_fire`].
    pub fn poll(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut due: Vec<(Instant, u64)> = self
            .entries
            .iter()
            .filter_map(|(id, entry)| {
                entry
                    .deadline
                    .filter(|_| entry.is_due(now))
                    .map(|deadline| (deadline, *id))
            })
            .collect();
        due.sort_unstable();

        let mut events = Vec::with_capacity(due.len());
        for (_, id) in due {
            if let Some(Entry {
                handle,
                deadline: Some(deadline),
                ..
            }) = self.entries.remove(&id)
            {
                events.push(TimerEvent::Expired { handle, deadline });
            }
        }

        for entry in self.entries.values_mut() {
            let (Some(every), Some(next)) = (entry.tick_every, entry.next_tick) else {
                continue;
            };
            if next <= now {
                entry.next_tick = now.checked_add(every);
                events.push(TimerEvent::Progress {
                    key: entry.handle.key,
                    remaining_fraction: entry.remaining_fraction(now),
                });
            }
        }

        events
    }

    /// Remaining share of the countdown, `None` once fired or canceled.
    #[must_use]
    pub fn remaining_fraction(&self, handle: &TimerHandle, now: Instant) -> Option<f32> {
        self.entries
            .get(&handle.id)
            .map(|entry| entry.remaining_fraction(now))
    }

    /// Whether `handle` is still waiting in the scheduler.
    #[must_use]
    pub fn is_pending(&self, handle: &TimerHandle) -> bool {
        self.entries.contains_key(&handle.id)
    }

    /// Earliest pending deadline. Timers that never expire are ignored.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().filter_map(|entry| entry.deadline).min()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn id(n: u64) -> NotificationId {
        NotificationId::from_raw(n)
    }

    fn expired(events: &[TimerEvent]) -> Vec<NotificationId> {
        events
            .iter()
            .filter_map(|event| match event {
                TimerEvent::Expired { handle, .. } => Some(handle.key()),
                TimerEvent::Progress { .. } => None,
            })
            .collect()
    }

    #[test]
    fn timer_fires_once_after_duration() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        let handle = scheduler.start(id(1), TimerPurpose::AutoDismiss, Duration::from_secs(5), t0);

        assert!(scheduler.poll(t0 + Duration::from_millis(4_999)).is_empty());

        let events = scheduler.poll(t0 + Duration::from_secs(5));
        assert_eq!(expired(&events), vec![id(1)]);
        assert!(handle.try_fire());
        assert!(!handle.try_fire());
        assert!(scheduler.poll(t0 + Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn cancel_before_expiry_prevents_fire() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        let handle = scheduler.start(id(1), TimerPurpose::AutoDismiss, Duration::from_secs(1), t0);

        assert!(scheduler.cancel(&handle));
        assert!(handle.is_canceled());
        assert!(scheduler.poll(t0 + Duration::from_secs(2)).is_empty());
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        let handle = scheduler.start(id(1), TimerPurpose::Exit, Duration::from_millis(300), t0);

        scheduler.poll(t0 + Duration::from_millis(300));
        assert!(handle.try_fire());
        assert!(!scheduler.cancel(&handle));
        assert!(handle.has_fired());
        assert!(!handle.is_canceled());
    }

    #[test]
    fn cancel_between_poll_and_dispatch_wins() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        let handle = scheduler.start(id(1), TimerPurpose::AutoDismiss, Duration::from_secs(1), t0);

        let events = scheduler.poll(t0 + Duration::from_secs(1));
        assert_eq!(events.len(), 1);

        assert!(scheduler.cancel(&handle));
        match &events[0] {
            TimerEvent::Expired { handle, .. } => assert!(!handle.try_fire()),
            TimerEvent::Progress { .. } => panic!("expected expiry"),
        }
    }

    #[test]
    fn expiries_come_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        scheduler.start(id(1), TimerPurpose::AutoDismiss, Duration::from_secs(7), t0);
        scheduler.start(id(2), TimerPurpose::AutoDismiss, Duration::from_secs(5), t0);
        scheduler.start(id(3), TimerPurpose::AutoDismiss, Duration::from_secs(5), t0);

        let events = scheduler.poll(t0 + Duration::from_secs(10));
        assert_eq!(expired(&events), vec![id(2), id(3), id(1)]);
    }

    #[test]
    fn purposes_are_independent() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        let enter = scheduler.start(id(1), TimerPurpose::Enter, Duration::from_millis(50), t0);
        let dismiss =
            scheduler.start(id(1), TimerPurpose::AutoDismiss, Duration::from_secs(5), t0);

        scheduler.cancel(&enter);
        assert!(scheduler.is_pending(&dismiss));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn progress_ticks_until_expiry() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        let handle = scheduler.start_with_progress(
            id(1),
            TimerPurpose::AutoDismiss,
            Duration::from_millis(1_000),
            Duration::from_millis(50),
            t0,
        );

        assert!(scheduler.poll(t0 + Duration::from_millis(10)).is_empty());

        let events = scheduler.poll(t0 + Duration::from_millis(500));
        match events.as_slice() {
            [TimerEvent::Progress { key, remaining_fraction }] => {
                assert_eq!(*key, id(1));
                assert_abs_diff_eq!(*remaining_fraction, 0.5, epsilon = 1e-4);
            }
            other => panic!("unexpected events: {other:?}"),
        }

        // Same instant again: the next tick is not due yet.
        assert!(scheduler.poll(t0 + Duration::from_millis(500)).is_empty());

        scheduler.cancel(&handle);
        assert!(scheduler.poll(t0 + Duration::from_millis(800)).is_empty());
    }

    #[test]
    fn cancel_all_reports_prevented_timers() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        let a = scheduler.start(id(1), TimerPurpose::AutoDismiss, Duration::from_secs(1), t0);
        let b = scheduler.start(id(2), TimerPurpose::Enter, Duration::from_secs(1), t0);

        assert_eq!(scheduler.cancel_all(), 2);
        assert!(a.is_canceled() && b.is_canceled());
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn unrepresentable_deadline_never_expires() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        let handle = scheduler.start_with_progress(
            id(4),
            TimerPurpose::AutoDismiss,
            Duration::MAX,
            Duration::from_millis(50),
            t0,
        );

        assert!(scheduler
            .poll(t0 + Duration::from_secs(365 * 24 * 60 * 60))
            .is_empty());
        assert_eq!(scheduler.next_deadline(), None);
        assert_eq!(scheduler.remaining_fraction(&handle, t0), Some(1.0));
        assert!(scheduler.cancel(&handle));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn zero_duration_is_due_immediately() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        let handle = scheduler.start(id(9), TimerPurpose::AutoDismiss, Duration::ZERO, t0);
        assert_eq!(scheduler.remaining_fraction(&handle, t0), Some(0.0));
        assert_eq!(expired(&scheduler.poll(t0)), vec![id(9)]);
    }
}
