//! Application context shared by every view.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::cart::{CartStore, SyncOutcome};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::scope::{ScopeGuard, ViewScope};
use crate::session::{SessionProbe, SessionStatus};
use crate::ui::{Location, NavigationRequest, Navigator, Notification, Notifier, Recorder};

/// Storefront context shared across all views.
///
/// Cheaply cloneable via `Arc`; owns the API client, the session probe, the
/// cart store and the root [`ViewScope`] every view scope descends from.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: ClientConfig,
    api: ApiClient,
    session: SessionProbe,
    cart: CartStore,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    root: ViewScope,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("api", &self.inner.api)
            .field("session", &self.inner.session.status())
            .field("shut_down", &self.inner.root.is_torn_down())
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Create a new storefront context.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config)?;
        Ok(Self {
            inner: Arc::new(StorefrontInner {
                session: SessionProbe::new(api.clone()),
                cart: CartStore::new(api.clone()),
                api,
                config,
                notifier,
                navigator,
                root: ViewScope::new(),
            }),
        })
    }

    /// Context whose notifications and navigations go to `recorder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_recorder(config: ClientConfig, recorder: &Recorder) -> Result<Self, ApiError> {
        Self::new(
            config,
            Arc::new(recorder.clone()),
            Arc::new(recorder.clone()),
        )
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn session(&self) -> &SessionProbe {
        &self.inner.session
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// A fresh scope for a view, torn down when the guard drops or the
    /// storefront shuts down.
    #[must_use]
    pub fn view_scope(&self) -> ScopeGuard {
        self.inner.root.child().guard()
    }

    pub fn notify(&self, notification: Notification) {
        self.inner.notifier.notify(notification);
    }

    pub fn navigate_to(&self, request: NavigationRequest) {
        debug!(to = %request.to, replace = request.replace, "Navigation requested");
        self.inner.navigator.navigate(request);
    }

    /// Header mount: probe the session and sync the cart concurrently.
    #[instrument(skip(self))]
    pub async fn on_mount(&self) -> (SessionStatus, SyncOutcome) {
        let guard = self.view_scope();
        let scope = guard.scope();
        tokio::join!(self.session().probe(scope), self.cart().sync(scope))
    }

    /// Route change: re-probe the session.
    #[instrument(skip_all, fields(location = %location))]
    pub async fn on_navigate(&self, location: &Location) -> SessionStatus {
        let guard = self.view_scope();
        self.session().probe(guard.scope()).await
    }

    /// Cancel every view's in-flight requests.
    pub fn shutdown(&self) {
        self.inner.root.teardown();
    }
}
