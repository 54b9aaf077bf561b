//! Terminal rendering of notifications and navigation.

use shopease_client::ui::{NavigationRequest, Navigator, Notification, NotificationLevel, Notifier};

/// Prints notifications to stdout. Navigation has no meaning in a one-shot
/// command, so requests are only reported.
#[derive(Debug, Clone, Copy)]
pub struct Terminal;

impl Notifier for Terminal {
    fn notify(&self, notification: Notification) {
        let marker = match notification.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        println!("[{marker}] {}", notification.message);
    }
}

impl Navigator for Terminal {
    fn navigate(&self, request: NavigationRequest) {
        if request.delay.is_zero() {
            println!("-> {}", request.to);
        } else {
            println!("-> {} (after {} ms)", request.to, request.delay.as_millis());
        }
    }
}
