// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the [`Notification`] builder handed to the manager,
//! the [`NotificationRecord`] the manager stores and publishes, and the
//! [`Kind`] enum that carries per-kind defaults.

use crate::config::Config;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Unique identifier for a notification.
///
/// Ids are allocated by the manager from a monotonic counter, so an id is
/// never reused while its manager lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// Kind determines the default display duration and visual styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    /// Operation completed successfully (5s by default).
    #[default]
    Success,
    /// Informational message (5s by default).
    Info,
    /// Warning that doesn't block operation (7s by default).
    Warning,
    /// Error requiring attention (manual dismiss).
    Error,
}

impl Kind {
    /// Returns the default auto-dismiss duration for this kind.
    /// Returns `None` for errors (manual dismiss required).
    #[must_use]
    pub fn auto_dismiss_duration(&self, config: &Config) -> Option<Duration> {
        match self {
            Kind::Success => Some(Duration::from_millis(config.success_ms)),
            Kind::Info => Some(Duration::from_millis(config.info_ms)),
            Kind::Warning => Some(Duration::from_millis(config.warning_ms)),
            Kind::Error => None,
        }
    }

    /// Whether this kind stays until dismissed when no duration is given.
    #[must_use]
    pub fn is_persistent_by_default(&self) -> bool {
        matches!(self, Kind::Error)
    }

    /// Returns the lowercase name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Success => "success",
            Kind::Info => "info",
            Kind::Warning => "warning",
            Kind::Error => "error",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle position of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalState {
    /// Just pushed; the enter animation is still staggered.
    Entering,
    Visible,
    /// Dismissed; waiting out the exit grace period.
    Removing,
    /// Purged from the store. Only seen on records handed back by removal.
    Removed,
}

impl RemovalState {
    /// Whether the record still counts against capacity.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !matches!(self, RemovalState::Removed)
    }

    /// Whether a dismissal trigger can still act on the record.
    #[must_use]
    pub fn is_dismissable(&self) -> bool {
        matches!(self, RemovalState::Entering | RemovalState::Visible)
    }
}

/// Error type returned by action callbacks.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

type ActionCallback = Arc<dyn Fn() -> Result<(), ActionError> + Send + Sync>;

/// A single call-to-action attached to a notification.
#[derive(Clone)]
pub struct Action {
    label: String,
    on_click: ActionCallback,
}

impl Action {
    /// Creates an action with a button label and a click callback.
    pub fn new<F>(label: impl Into<String>, on_click: F) -> Self
    where
        F: Fn() -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            on_click: Arc::new(on_click),
        }
    }

    /// Returns the button label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn run(&self) -> Result<(), ActionError> {
        (self.on_click)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Per-call overrides accepted by the `notify` entry points.
#[derive(Debug, Clone, Default)]
pub struct NotifyOptions {
    /// Overrides the kind's default auto-dismiss duration.
    pub duration: Option<Duration>,
    /// `Some(true)` forces manual dismissal and wins over `duration`.
    pub persistent: Option<bool>,
    /// Call-to-action shown on the toast.
    pub action: Option<Action>,
}

/// A notification to be pushed to the manager.
///
/// Building a notification does not validate the title: empty titles are
/// accepted.
#[derive(Debug, Clone)]
pub struct Notification {
    kind: Kind,
    title: String,
    message: Option<String>,
    options: NotifyOptions,
}

impl Notification {
    /// Creates a notification of `kind` with the given title.
    pub fn new(kind: Kind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: None,
            options: NotifyOptions::default(),
        }
    }

    /// Creates a success notification.
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(Kind::Success, title)
    }

    /// Creates an info notification.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(Kind::Info, title)
    }

    /// Creates a warning notification.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(Kind::Warning, title)
    }

    /// Creates an error notification.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(Kind::Error, title)
    }

    /// Adds body text below the title.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets a custom auto-dismiss duration, overriding the kind default.
    #[must_use]
    pub fn auto_dismiss(mut self, duration: Duration) -> Self {
        self.options.duration = Some(duration);
        self
    }

    /// Disables auto-dismiss regardless of any duration.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.options.persistent = Some(true);
        self
    }

    /// Attaches a call-to-action, replacing any previous one.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.options.action = Some(action);
        self
    }

    /// Applies every option that is set in `options`.
    #[must_use]
    pub fn with_options(mut self, options: NotifyOptions) -> Self {
        if options.duration.is_some() {
            self.options.duration = options.duration;
        }
        if options.persistent.is_some() {
            self.options.persistent = options.persistent;
        }
        if options.action.is_some() {
            self.options.action = options.action;
        }
        self
    }

    /// Returns the notification kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the title text.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body text, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Resolves the countdown this notification gets under `config`.
    ///
    /// `None` means the notification is persistent. An explicit
    /// `persistent: true` always wins; an explicit duration makes even an
    /// error auto-dismiss.
    #[must_use]
    pub fn effective_duration(&self, config: &Config) -> Option<Duration> {
        if self.options.persistent == Some(true) {
            return None;
        }
        self.options
            .duration
            .or_else(|| self.kind.auto_dismiss_duration(config))
    }
}

/// An immutable notification as stored by the manager.
///
/// Only `removal_state` changes after creation, and only through the store.
#[derive(Debug, Clone)]
pub struct NotificationRecord {
    id: NotificationId,
    kind: Kind,
    title: String,
    message: Option<String>,
    created_at: Instant,
    timestamp: DateTime<Utc>,
    duration: Option<Duration>,
    persistent: bool,
    action: Option<Action>,
    removal_state: RemovalState,
}

impl NotificationRecord {
    pub(crate) fn new(
        id: NotificationId,
        notification: Notification,
        config: &Config,
        created_at: Instant,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let duration = notification.effective_duration(config);
        Self {
            id,
            kind: notification.kind,
            title: notification.title,
            message: notification.message,
            created_at,
            timestamp,
            duration,
            persistent: duration.is_none(),
            action: notification.options.action,
            removal_state: RemovalState::Entering,
        }
    }

    /// Returns the notification's unique ID.
    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the notification kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the title text.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body text, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Monotonic push time; auto-dismiss is measured from here.
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Wall-clock push time, for display.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Auto-dismiss duration, `None` when persistent.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Whether the record waits for a manual dismissal.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Returns the attached action, if any.
    #[must_use]
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn removal_state(&self) -> RemovalState {
        self.removal_state
    }

    pub(crate) fn set_removal_state(&mut self, state: RemovalState) {
        self.removal_state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(notification: Notification) -> NotificationRecord {
        NotificationRecord::new(
            NotificationId::from_raw(1),
            notification,
            &Config::default(),
            Instant::now(),
            Utc::now(),
        )
    }

    #[test]
    fn error_kind_has_no_auto_dismiss() {
        assert!(Kind::Error.auto_dismiss_duration(&Config::default()).is_none());
        assert!(Kind::Error.is_persistent_by_default());
    }

    #[test]
    fn default_durations_match_kind() {
        let config = Config::default();
        assert_eq!(
            Kind::Success.auto_dismiss_duration(&config),
            Some(Duration::from_millis(5_000))
        );
        assert_eq!(
            Kind::Info.auto_dismiss_duration(&config),
            Kind::Success.auto_dismiss_duration(&config)
        );
        assert_eq!(
            Kind::Warning.auto_dismiss_duration(&config),
            Some(Duration::from_millis(7_000))
        );
    }

    #[test]
    fn persistent_wins_over_duration() {
        let config = Config::default();
        let n = Notification::success("saved")
            .auto_dismiss(Duration::from_secs(1))
            .persistent();
        assert_eq!(n.effective_duration(&config), None);
    }

    #[test]
    fn explicit_duration_makes_error_auto_dismiss() {
        let config = Config::default();
        let n = Notification::error("failed").auto_dismiss(Duration::from_secs(2));
        assert_eq!(n.effective_duration(&config), Some(Duration::from_secs(2)));
    }

    #[test]
    fn with_options_only_overrides_set_fields() {
        let n = Notification::warning("disk").persistent().with_options(NotifyOptions {
            duration: Some(Duration::from_secs(1)),
            ..NotifyOptions::default()
        });
        assert_eq!(n.effective_duration(&Config::default()), None);
    }

    #[test]
    fn record_starts_entering_and_derives_persistence() {
        let r = record(Notification::error(""));
        assert_eq!(r.removal_state(), RemovalState::Entering);
        assert!(r.is_persistent());
        assert_eq!(r.title(), "");

        let r = record(Notification::info("sync").with_message("3 listings updated"));
        assert!(!r.is_persistent());
        assert_eq!(r.message(), Some("3 listings updated"));
    }

    #[test]
    fn action_debug_hides_callback() {
        let action = Action::new("Undo", || Ok(()));
        let rendered = format!("{action:?}");
        assert!(rendered.contains("Undo"));
        assert!(action.run().is_ok());
    }

    #[test]
    fn notification_constructors_set_correct_kind() {
        assert_eq!(Notification::success("").kind(), Kind::Success);
        assert_eq!(Notification::info("").kind(), Kind::Info);
        assert_eq!(Notification::warning("").kind(), Kind::Warning);
        assert_eq!(Notification::error("").kind(), Kind::Error);
    }

    #[test]
    fn id_displays_as_token() {
        assert_eq!(NotificationId::from_raw(7).to_string(), "toast-7");
    }
}
