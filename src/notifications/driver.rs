// SPDX-License-Identifier: MPL-2.0
//! Background tick source for hosts without their own event loop.
//!
//! The manager is passive: something has to call [`Manager::tick`]. GUI hosts
//! usually do that from their frame or subscription loop. Everything else can
//! share the manager behind a tokio mutex and let [`spawn`] tick it.

use super::manager::Manager;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Manager shared between the driver and the rest of the application.
pub type SharedManager = Arc<Mutex<Manager>>;

/// Wraps a manager for use with [`spawn`].
#[must_use]
pub fn shared(manager: Manager) -> SharedManager {
    Arc::new(Mutex::new(manager))
}

/// Ticks `manager` every `period` until every other handle to it is dropped.
///
/// Must be called from within a tokio runtime.
pub fn spawn(manager: &SharedManager, period: Duration) -> JoinHandle<()> {
    let weak = Arc::downgrade(manager);
    let period = period.max(Duration::from_millis(1));

    tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let Some(manager) = weak.upgrade() else {
                tracing::debug!("notification manager dropped, driver stopping");
                break;
            };
            manager.lock().await.tick();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::notifications::notification::{Notification, RemovalState};

    #[tokio::test(start_paused = true)]
    async fn driver_expires_success_toast() {
        let manager = shared(Manager::new());
        let id = manager.lock().await.push(Notification::success("Saved"));
        let driver = spawn(&manager, Config::default().progress_interval());

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            manager.lock().await.get(id).map(|r| r.removal_state()),
            Some(RemovalState::Visible)
        );

        time::sleep(Duration::from_millis(5_200)).await;
        assert!(manager.lock().await.is_empty());

        driver.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn driver_stops_when_manager_dropped() {
        let manager = shared(Manager::new());
        let driver = spawn(&manager, Duration::from_millis(50));

        drop(manager);
        time::sleep(Duration::from_millis(200)).await;
        assert!(driver.is_finished());
    }
}
