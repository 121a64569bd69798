// SPDX-License-Identifier: MPL-2.0
//! `toastline` manages short-lived toast notifications.
//!
//! It keeps a capacity-bounded queue of notifications, runs each one through
//! an enter / visible / removing lifecycle with cancelable countdowns, and
//! publishes immutable snapshots to subscribers. Rendering is left to the
//! host; see [`notifications::presentation`] for a toolkit-neutral view.

pub mod clock;
pub mod config;
pub mod error;
pub mod notifications;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use notifications::{Kind, Manager, Notification, NotificationId, NotifyOptions};
