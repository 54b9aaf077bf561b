//! Session probe.
//!
//! Authentication state is never stored on disk and never trusted across
//! navigations: every route change re-derives it from `GET user/profile`.
//! A 2xx means signed in; anything else, including transport failures,
//! means signed out.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::scope::ViewScope;

/// Authentication status as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No probe has completed yet.
    #[default]
    Unknown,
    Authenticated,
    Anonymous,
}

impl SessionStatus {
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// Probes the session and publishes the result to subscribers.
///
/// Clones share the same status channel.
#[derive(Debug, Clone)]
pub struct SessionProbe {
    api: ApiClient,
    status: Arc<watch::Sender<SessionStatus>>,
}

impl SessionProbe {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let (status, _) = watch::channel(SessionStatus::Unknown);
        Self {
            api,
            status: Arc::new(status),
        }
    }

    /// Last observed status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status().is_authenticated()
    }

    /// Receiver that observes every status change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Record a status learned elsewhere (login succeeded, logout finished).
    pub fn set(&self, status: SessionStatus) {
        self.status.send_replace(status);
    }

    /// Query the profile endpoint and record the outcome.
    ///
    /// A cancelled probe leaves the previous status in place.
    #[instrument(skip_all)]
    pub async fn probe(&self, scope: &ViewScope) -> SessionStatus {
        let status = match scope.run(self.api.profile()).await {
            Ok(()) => SessionStatus::Authenticated,
            Err(err) if err.is_cancelled() => {
                debug!("Session probe cancelled");
                return self.status();
            }
            Err(err) => {
                debug!(error = %err, "Session probe failed; treating as signed out");
                SessionStatus::Anonymous
            }
        };
        self.set(status);
        status
    }
}
