// SPDX-License-Identifier: MPL-2.0
//! The owned, ordered collection of live notification records.
//!
//! [`Store`] is the only mutable state shared between the manager and the
//! rendering side. It is mutated exclusively through `push`, `set_state`,
//! `mark_all`, `remove` and `clear`; readers get [`Snapshot`]s, which are
//! immutable and detached from the store.
//!
//! Listeners registered with [`Store::subscribe`] run synchronously once per
//! committed mutation, each receiving the latest snapshot. Calls that change
//! nothing (unknown id, same state) do not notify.

use super::notification::{NotificationId, NotificationRecord, RemovalState};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Immutable list of records in arrival order.
pub type Snapshot = Arc<[NotificationRecord]>;

type Listener = Box<dyn FnMut(&Snapshot) + Send>;

/// Token returned by `subscribe`; call [`Subscription::unsubscribe`] to stop
/// receiving updates. Dropping it keeps the listener registered.
#[derive(Debug, Clone)]
pub struct Subscription {
    active: Arc<AtomicBool>,
}

impl Subscription {
    pub(crate) fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Stops delivery to the listener. Idempotent.
    pub fn unsubscribe(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Whether the listener still receives updates.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

struct ListenerSlot {
    subscription: Subscription,
    callback: Listener,
}

/// Capacity-bounded queue of notification records.
pub struct Store {
    records: VecDeque<NotificationRecord>,
    capacity: usize,
    listeners: Vec<ListenerSlot>,
}

impl Store {
    /// Creates an empty store; `capacity` is clamped to at least 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: capacity.max(1),
            listeners: Vec::new(),
        }
    }

    /// Maximum number of live records.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records that count against capacity.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.removal_state().is_live())
            .count()
    }

    /// Appends `record` at the tail.
    ///
    /// When the store is already at capacity, the oldest live record is
    /// purged first and returned so the caller can release anything it holds
    /// for it.
    pub fn push(&mut self, record: NotificationRecord) -> Option<NotificationRecord> {
        let evicted = if self.live_count() >= self.capacity {
            self.oldest_live().and_then(|oldest| self.remove(oldest))
        } else {
            None
        };

        self.records.push_back(record);
        self.notify();
        evicted
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&NotificationRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Position of `id` in arrival order.
    #[must_use]
    pub fn position(&self, id: NotificationId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    /// Id of the oldest record that still counts against capacity.
    #[must_use]
    pub fn oldest_live(&self) -> Option<NotificationId> {
        self.records
            .iter()
            .find(|record| record.removal_state().is_live())
            .map(NotificationRecord::id)
    }

    /// Commits a lifecycle transition. Returns `false` (and does not notify)
    /// when `id` is absent or already in `state`.
    pub fn set_state(&mut self, id: NotificationId, state: RemovalState) -> bool {
        let Some(record) = self.records.iter_mut().find(|record| record.id() == id) else {
            return false;
        };
        if record.removal_state() == state {
            return false;
        }
        record.set_removal_state(state);
        self.notify();
        true
    }

    /// Moves every dismissable record to `state` in a single mutation.
    /// Returns how many changed.
    pub fn mark_all(&mut self, state: RemovalState) -> usize {
        let mut changed = 0;
        for record in self
            .records
            .iter_mut()
            .filter(|record| record.removal_state().is_dismissable())
        {
            if record.removal_state() != state {
                record.set_removal_state(state);
                changed += 1;
            }
        }
        if changed > 0 {
            self.notify();
        }
        changed
    }

    /// Purges `id`. Idempotent: unknown ids are a no-op returning `None`.
    pub fn remove(&mut self, id: NotificationId) -> Option<NotificationRecord> {
        let position = self.position(id)?;
        let mut record = self.records.remove(position)?;
        record.set_removal_state(RemovalState::Removed);
        self.notify();
        Some(record)
    }

    /// Purges every record.
    pub fn clear(&mut self) -> Vec<NotificationRecord> {
        if self.records.is_empty() {
            return Vec::new();
        }
        let removed: Vec<NotificationRecord> = self
            .records
            .drain(..)
            .map(|mut record| {
                record.set_removal_state(RemovalState::Removed);
                record
            })
            .collect();
        self.notify();
        removed
    }

    /// Returns an immutable snapshot in arrival order.
    #[must_use]
    pub fn list(&self) -> Snapshot {
        self.records.iter().cloned().collect()
    }

    /// Number of records, including those in their exit grace.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registers a listener called after every committed mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        let subscription = Subscription::new();
        self.listeners.push(ListenerSlot {
            subscription: subscription.clone(),
            callback: Box::new(listener),
        });
        subscription
    }

    /// Number of active listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|slot| slot.subscription.is_active())
            .count()
    }

    fn notify(&mut self) {
        self.listeners.retain(|slot| slot.subscription.is_active());
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.list();
        for slot in &mut self.listeners {
            if slot.subscription.is_active() {
                (slot.callback)(&snapshot);
            }
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("records", &self.records)
            .field("capacity", &self.capacity)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
