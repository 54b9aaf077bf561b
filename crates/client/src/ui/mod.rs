//! Seams between view logic and whatever renders it.
//!
//! Views never draw anything. They report transient messages through a
//! [`Notifier`] (the toast area) and ask a [`Navigator`] to change route.
//! The CLI implements both for the terminal; tests use the in-memory
//! [`Recorder`].

pub mod location;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

pub use location::{Location, login_redirect, refer_target};

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast-style message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// A route change requested by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Target path including any query string.
    pub to: String,
    /// Replace the current history entry instead of pushing.
    pub replace: bool,
    /// How long to wait before navigating (lets a notification be read).
    pub delay: Duration,
}

impl NavigationRequest {
    #[must_use]
    pub fn push(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            replace: false,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub const fn replacing(mut self) -> Self {
        self.replace = true;
        self
    }
}

/// Displays transient notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Performs route changes. Implementations own the delay.
pub trait Navigator: Send + Sync {
    fn navigate(&self, request: NavigationRequest);
}

/// In-memory [`Notifier`] and [`Navigator`] that records everything it is
/// given. Useful for headless consumers and tests.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    notifications: Arc<Mutex<Vec<Notification>>>,
    navigations: Arc<Mutex<Vec<NavigationRequest>>>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn navigations(&self) -> Vec<NavigationRequest> {
        self.navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent navigation request, if any.
    #[must_use]
    pub fn last_navigation(&self) -> Option<NavigationRequest> {
        self.navigations().pop()
    }
}

impl Notifier for Recorder {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

impl Navigator for Recorder {
    fn navigate(&self, request: NavigationRequest) {
        self.navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_request_builders() {
        let request = NavigationRequest::push("/")
            .after(Duration::from_millis(1500))
            .replacing();
        assert_eq!(request.to, "/");
        assert!(request.replace);
        assert_eq!(request.delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_recorder_records_in_order() {
        let recorder = Recorder::new();
        recorder.notify(Notification::success("Saved"));
        recorder.notify(Notification::error("Nope"));
        recorder.navigate(NavigationRequest::push("/login"));

        let notes = recorder.notifications();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].level, NotificationLevel::Success);
        assert_eq!(notes[1].message, "Nope");
        assert_eq!(
            recorder.last_navigation().map(|n| n.to),
            Some("/login".to_string())
        );
    }
}
