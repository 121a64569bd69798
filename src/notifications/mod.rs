// SPDX-License-Identifier: MPL-2.0
//! Toast notification system for user feedback.
//!
//! Notifications appear temporarily to inform users about actions (save
//! success, errors, etc.) without blocking interaction.
//!
//! # Components
//!
//! - [`notification`] - `Notification` builder, stored `NotificationRecord` and `Kind`
//! - [`store`] - capacity-bounded record queue with snapshot subscribers
//! - [`timer`] - cancelable countdowns with exactly-once expiry
//! - [`manager`] - `Manager` driving each record's lifecycle
//! - [`presentation`] - render-neutral toast views
//! - [`driver`] - tokio task ticking a shared manager
//!
//! # Usage
//!
//! ```
//! use toastline::notifications::{Manager, Notification, NotifyOptions};
//!
//! let mut manager = Manager::new();
//! manager.push(Notification::success("Listing saved"));
//! manager.error("Upload failed", Some("Check your connection"), NotifyOptions::default());
//!
//! // Re-render whenever something changes.
//! let _subscription = manager.subscribe(|snapshot| {
//!     println!("{} toast(s)", snapshot.len());
//! });
//!
//! // Call regularly, e.g. every 50ms.
//! manager.tick();
//! assert_eq!(manager.list().len(), 2);
//! ```
//!
//! # Defaults
//!
//! - Duration: 5s for success/info, 7s for warnings, manual dismiss for errors
//! - Max live toasts: 5 (the oldest is evicted)
//! - Enter stagger: 50ms + 100ms per queue position
//! - Exit grace: 300ms

pub mod driver;
pub mod manager;
pub mod notification;
pub mod presentation;
pub mod store;
pub mod timer;

pub use driver::SharedManager;
pub use manager::{DismissReason, Manager, Message};
pub use notification::{
    Action, ActionError, Kind, Notification, NotificationId, NotificationRecord, NotifyOptions,
    RemovalState,
};
pub use presentation::{Icon, Region, Rgb, ToastView};
pub use store::{Snapshot, Store, Subscription};
pub use timer::{Scheduler, TimerEvent, TimerHandle, TimerPurpose};
