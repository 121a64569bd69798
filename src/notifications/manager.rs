// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle management.
//!
//! The `Manager` owns the [`Store`] and the [`Scheduler`] and runs each
//! record through `Entering → Visible → Removing → Removed`:
//!
//! ```text
//! push ──► Entering ──(stagger)──► Visible
//!             │                      │
//!             └──────┬───────────────┘
//!                    ▼  expiry / dismiss / action / eviction / clear_all
//!                 Removing ──(exit grace)──► Removed (purged from the store)
//! ```
//!
//! The auto-dismiss countdown starts at push, independently of the cosmetic
//! stagger, so a record's lifetime never depends on its queue position.
//! Eviction and `clear_all` go through the same removal path but purge
//! immediately instead of waiting out the grace period.

use super::notification::{
    Kind, Notification, NotificationId, NotificationRecord, NotifyOptions, RemovalState,
};
use super::presentation::ToastView;
use super::store::{Snapshot, Store, Subscription};
use super::timer::{Scheduler, TimerEvent, TimerHandle, TimerPurpose};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Messages for notification state changes.
#[derive(Debug, Clone)]
pub enum Message {
    /// Dismiss a specific notification by ID.
    Dismiss(NotificationId),
    /// Run a notification's action, then dismiss it.
    ActionClicked(NotificationId),
    /// Dismiss everything.
    ClearAll,
    /// Process due timers.
    Tick,
}

/// Why a record left the Visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Expired,
    Manual,
    Action,
    Evicted,
    Cleared,
}

/// Timers held for one record. At most one per purpose.
#[derive(Debug, Default)]
struct RecordTimers {
    auto_dismiss: Option<TimerHandle>,
    enter: Option<TimerHandle>,
    exit: Option<TimerHandle>,
}

impl RecordTimers {
    fn cancel_all(&mut self, scheduler: &mut Scheduler) {
        for handle in [
            self.auto_dismiss.take(),
            self.enter.take(),
            self.exit.take(),
        ]
        .into_iter()
        .flatten()
        {
            scheduler.cancel(&handle);
        }
    }
}

type ProgressListener = Box<dyn FnMut(NotificationId, f32) + Send>;

struct ProgressSlot {
    subscription: Subscription,
    callback: ProgressListener,
}

/// Manages the notification queue and each record's lifecycle.
pub struct Manager {
    config: Config,
    clock: Arc<dyn Clock>,
    store: Store,
    scheduler: Scheduler,
    timers: HashMap<NotificationId, RecordTimers>,
    progress: HashMap<NotificationId, f32>,
    progress_listeners: Vec<ProgressSlot>,
    next_id: u64,
}

impl Manager {
    /// Creates a new empty notification manager with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a manager with custom settings and the system clock.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a manager reading time from `clock`.
    #[must_use]
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        let config = config.normalized();
        Self {
            store: Store::new(config.max_active),
            config,
            clock,
            scheduler: Scheduler::new(),
            timers: HashMap::new(),
            progress: HashMap::new(),
            progress_listeners: Vec::new(),
            next_id: 1,
        }
    }

    /// Returns the settings in effect, after normalization.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---------------------------
    // Entry points
    // ---------------------------

    /// Shows a success notification (5s by default).
    pub fn success(
        &mut self,
        title: impl Into<String>,
        message: Option<&str>,
        options: NotifyOptions,
    ) -> NotificationId {
        self.notify(Kind::Success, title, message, options)
    }

    /// Shows an info notification (5s by default).
    pub fn info(
        &mut self,
        title: impl Into<String>,
        message: Option<&str>,
        options: NotifyOptions,
    ) -> NotificationId {
        self.notify(Kind::Info, title, message, options)
    }

    /// Shows a warning notification (7s by default).
    pub fn warning(
        &mut self,
        title: impl Into<String>,
        message: Option<&str>,
        options: NotifyOptions,
    ) -> NotificationId {
        self.notify(Kind::Warning, title, message, options)
    }

    /// Shows an error notification. Stays until dismissed unless a duration is given.
    pub fn error(
        &mut self,
        title: impl Into<String>,
        message: Option<&str>,
        options: NotifyOptions,
    ) -> NotificationId {
        self.notify(Kind::Error, title, message, options)
    }

    /// Shows a notification of any `kind` with optional body text.
    pub fn notify(
        &mut self,
        kind: Kind,
        title: impl Into<String>,
        message: Option<&str>,
        options: NotifyOptions,
    ) -> NotificationId {
        let mut notification = Notification::new(kind, title).with_options(options);
        if let Some(message) = message {
            notification = notification.with_message(message);
        }
        self.push(notification)
    }

    /// Pushes a new notification and returns its id.
    ///
    /// If the queue is full, the oldest live notification is evicted first.
    /// The auto-dismiss countdown (if any) starts now.
    pub fn push(&mut self, notification: Notification) -> NotificationId {
        log_raised(&notification);

        while self.store.live_count() >= self.store.capacity() {
            let Some(oldest) = self.store.oldest_live() else {
                break;
            };
            self.remove_now(oldest, DismissReason::Evicted);
        }

        let now = self.clock.now();
        let id = NotificationId::from_raw(self.next_id);
        self.next_id += 1;

        let record = NotificationRecord::new(
            id,
            notification,
            &self.config,
            now,
            self.clock.wall_now(),
        );
        let duration = record.duration();
        let index = self.store.live_count();

        if let Some(evicted) = self.store.push(record) {
            self.release(evicted.id());
        }

        let mut timers = RecordTimers::default();
        if let Some(duration) = duration {
            timers.auto_dismiss = Some(self.scheduler.start_with_progress(
                id,
                TimerPurpose::AutoDismiss,
                duration,
                self.config.progress_interval(),
                now,
            ));
            self.progress.insert(id, 1.0);
        }
        timers.enter = Some(self.scheduler.start(
            id,
            TimerPurpose::Enter,
            self.config.stagger_delay(index),
            now,
        ));
        self.timers.insert(id, timers);

        tracing::debug!(%id, index, ?duration, "notification pushed");
        id
    }

    /// Dismisses a notification by its ID.
    ///
    /// Returns `true` if this call started the removal. Unknown ids and
    /// records already leaving are a no-op.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let now = self.clock.now();
        self.begin_removal(id, DismissReason::Manual, now)
    }

    /// Runs the notification's action, then dismisses it.
    ///
    /// The dismissal happens whatever the callback does. A callback error is
    /// returned as [`Error::Action`]; a callback panic resumes after the
    /// record has been dismissed.
    pub fn invoke_action(&mut self, id: NotificationId) -> Result<()> {
        let Some(record) = self.store.get(id) else {
            tracing::trace!(%id, "action on unknown notification ignored");
            return Ok(());
        };
        if !record.removal_state().is_dismissable() {
            return Ok(());
        }
        let Some(action) = record.action().cloned() else {
            return Ok(());
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| action.run()));

        let now = self.clock.now();
        self.begin_removal(id, DismissReason::Action, now);

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => {
                tracing::warn!(%id, label = action.label(), error = %source, "notification action failed");
                Err(Error::Action {
                    label: action.label().to_string(),
                    source,
                })
            }
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Clears all notifications and cancels every pending timer.
    pub fn clear_all(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.store.mark_all(RemovalState::Removing);

        for (_, mut timers) in self.timers.drain() {
            timers.cancel_all(&mut self.scheduler);
        }
        let stray = self.scheduler.cancel_all();
        self.progress.clear();

        let removed = self.store.clear();
        tracing::debug!(
            count = removed.len(),
            stray_timers = stray,
            reason = ?DismissReason::Cleared,
            "notifications cleared"
        );
    }

    /// Processes every timer due at the current time.
    ///
    /// Should be called periodically (e.g., every 50ms) to drive expiry,
    /// stagger and exit transitions.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.advance_to(now);
    }

    /// Handles a notification message.
    pub fn handle_message(&mut self, message: &Message) -> Result<()> {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(*id);
            }
            Message::ActionClicked(id) => return self.invoke_action(*id),
            Message::ClearAll => self.clear_all(),
            Message::Tick => self.tick(),
        }
        Ok(())
    }

    // ---------------------------
    // Queries
    // ---------------------------

    /// Returns an immutable snapshot in arrival order.
    #[must_use]
    pub fn list(&self) -> Snapshot {
        self.store.list()
    }

    /// Looks up a notification by id.
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&NotificationRecord> {
        self.store.get(id)
    }

    /// Returns the number of notifications in the store (any state).
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns whether the manager holds no notifications.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Last reported countdown share for `id` (1.0 fresh, 0.0 due).
    /// `None` for persistent or departed records.
    #[must_use]
    pub fn progress(&self, id: NotificationId) -> Option<f32> {
        self.progress.get(&id).copied()
    }

    /// Number of timers still pending, of any purpose.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Render-neutral views of the current records.
    #[must_use]
    pub fn views(&self) -> Vec<ToastView> {
        self.store
            .list()
            .iter()
            .map(|record| ToastView::from_record(record, self.progress(record.id())))
            .collect()
    }

    // ---------------------------
    // Subscriptions
    // ---------------------------

    /// Registers a listener called with a fresh snapshot after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Registers a listener for countdown progress ticks.
    pub fn subscribe_progress<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(NotificationId, f32) + Send + 'static,
    {
        let subscription = Subscription::new();
        self.progress_listeners.push(ProgressSlot {
            subscription: subscription.clone(),
            callback: Box::new(listener),
        });
        subscription
    }

    // ---------------------------
    // Lifecycle internals
    // ---------------------------

    /// Standard removal path: cancel the record's countdowns, commit
    /// Removing and start the exit grace timer anchored at `at`.
    fn begin_removal(&mut self, id: NotificationId, reason: DismissReason, at: Instant) -> bool {
        let Some(state) = self.store.get(id).map(NotificationRecord::removal_state) else {
            tracing::trace!(%id, ?reason, "dismiss of unknown notification ignored");
            return false;
        };
        if !state.is_dismissable() {
            tracing::trace!(%id, ?reason, ?state, "notification already leaving");
            return false;
        }

        let timers = self.timers.entry(id).or_default();
        timers.cancel_all(&mut self.scheduler);
        self.progress.remove(&id);

        self.store.set_state(id, RemovalState::Removing);
        let exit = self
            .scheduler
            .start(id, TimerPurpose::Exit, self.config.exit_grace(), at);
        self.timers.entry(id).or_default().exit = Some(exit);

        tracing::debug!(%id, ?reason, "notification dismissed");
        true
    }

    /// Removal path without grace: used for eviction, where the slot is
    /// needed right away.
    fn remove_now(&mut self, id: NotificationId, reason: DismissReason) {
        let dismissable = self
            .store
            .get(id)
            .is_some_and(|record| record.removal_state().is_dismissable());
        if dismissable {
            if let Some(timers) = self.timers.get_mut(&id) {
                timers.cancel_all(&mut self.scheduler);
            }
            self.store.set_state(id, RemovalState::Removing);
        }
        self.purge(id);
        tracing::debug!(%id, ?reason, "notification removed immediately");
    }

    /// Drops the record from the store along with anything held for it.
    fn purge(&mut self, id: NotificationId) {
        self.release(id);
        if self.store.remove(id).is_some() {
            tracing::debug!(%id, "notification purged");
        }
    }

    fn release(&mut self, id: NotificationId) {
        if let Some(mut timers) = self.timers.remove(&id) {
            timers.cancel_all(&mut self.scheduler);
        }
        self.progress.remove(&id);
    }

    /// Dispatches timers until nothing is due at `now`, one deadline at a
    /// time. Timers started while dispatching are anchored at the firing
    /// deadline and join the queue in order, so one coarse tick produces the
    /// same sequence of mutations as many fine ones.
    fn advance_to(&mut self, now: Instant) {
        loop {
            let at = match self.scheduler.next_deadline() {
                Some(deadline) if deadline < now => deadline,
                _ => now,
            };
            let events = self.scheduler.poll(at);
            if events.is_empty() && at == now {
                break;
            }
            for event in events {
                match event {
                    TimerEvent::Expired { handle, deadline } => {
                        if !handle.try_fire() {
                            tracing::trace!(id = %handle.key(), purpose = ?handle.purpose(), "canceled timer skipped");
                            continue;
                        }
                        self.on_expired(&handle, deadline);
                    }
                    TimerEvent::Progress {
                        key,
                        remaining_fraction,
                    } => self.on_progress(key, remaining_fraction),
                }
            }
        }
    }

    fn on_expired(&mut self, handle: &TimerHandle, deadline: Instant) {
        let id = handle.key();
        tracing::trace!(%id, purpose = ?handle.purpose(), "timer fired");
        match handle.purpose() {
            TimerPurpose::AutoDismiss => {
                if let Some(timers) = self.timers.get_mut(&id) {
                    timers.auto_dismiss = None;
                }
                self.begin_removal(id, DismissReason::Expired, deadline);
            }
            TimerPurpose::Enter => {
                if let Some(timers) = self.timers.get_mut(&id) {
                    timers.enter = None;
                }
                let entering = self
                    .store
                    .get(id)
                    .is_some_and(|record| record.removal_state() == RemovalState::Entering);
                if entering {
                    self.store.set_state(id, RemovalState::Visible);
                }
            }
            TimerPurpose::Exit => {
                if let Some(timers) = self.timers.get_mut(&id) {
                    timers.exit = None;
                }
                self.purge(id);
            }
        }
    }

    fn on_progress(&mut self, id: NotificationId, remaining: f32) {
        self.progress.insert(id, remaining);
        self.progress_listeners
            .retain(|slot| slot.subscription.is_active());
        for slot in &mut self.progress_listeners {
            (slot.callback)(id, remaining);
        }
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("pending_timers", &self.scheduler.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

/// Warnings and errors raised to the user are also worth a log line.
fn log_raised(notification: &Notification) {
    match notification.kind() {
        Kind::Warning => {
            tracing::warn!(title = notification.title(), "warning notification raised");
        }
        Kind::Error => {
            tracing::error!(title = notification.title(), "error notification raised");
        }
        Kind::Success | Kind::Info => {}
    }
}
