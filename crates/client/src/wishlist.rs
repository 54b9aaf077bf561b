//! Wishlist toggle.
//!
//! The local [`Wishlist`] is only a mirror. It is filled once by
//! [`WishlistToggle::load`] and afterwards replaced wholesale by the set each
//! toggle response carries.

use tracing::{debug, instrument, warn};

use shopease_core::{ProductId, Wishlist};

use crate::error::ApiError;
use crate::scope::ScopeGuard;
use crate::state::Storefront;
use crate::ui::{Location, NavigationRequest, Notification, login_redirect};

/// Shown when a signed-out user tries to save a product.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login to add products to your wishlist.";

/// Shown when a toggle fails without a server message.
pub const TOGGLE_FALLBACK_MESSAGE: &str = "Error updating wishlist";

const UPDATED_FALLBACK_MESSAGE: &str = "Wishlist updated";

/// Toggle control label for a product in the wishlist.
pub const SAVED_LABEL: &str = "Saved";
/// Toggle control label for a product not in the wishlist.
pub const SAVE_LABEL: &str = "Save";

/// What a toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The server accepted the toggle; the local set was replaced.
    Updated,
    /// 401: the user was sent to the login page.
    LoginRequired { redirect: String },
    /// Any other failure; the local set is unchanged.
    Failed { message: String },
    /// The view was torn down first.
    Cancelled,
}

/// Wishlist state for one product list view.
#[derive(Debug)]
pub struct WishlistToggle {
    storefront: Storefront,
    guard: ScopeGuard,
    wishlist: Wishlist,
}

impl WishlistToggle {
    #[must_use]
    pub fn new(storefront: &Storefront) -> Self {
        Self {
            storefront: storefront.clone(),
            guard: storefront.view_scope(),
            wishlist: Wishlist::new(),
        }
    }

    /// Build with the scope of an enclosing view.
    #[must_use]
    pub fn with_guard(storefront: &Storefront, guard: ScopeGuard) -> Self {
        Self {
            storefront: storefront.clone(),
            guard,
            wishlist: Wishlist::new(),
        }
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    #[must_use]
    pub fn contains(&self, product_id: &str) -> bool {
        self.wishlist.contains(product_id)
    }

    /// "Saved" for members, "Save" otherwise.
    #[must_use]
    pub fn label(&self, product_id: &str) -> &'static str {
        if self.contains(product_id) {
            SAVED_LABEL
        } else {
            SAVE_LABEL
        }
    }

    /// Initial fetch. Failures are logged and leave the wishlist empty.
    #[instrument(skip_all)]
    pub async fn load(&mut self) {
        let api = self.storefront.api();
        match self.guard.scope().run(api.wishlist()).await {
            Ok(wishlist) => self.wishlist = wishlist,
            Err(ApiError::Cancelled) => {}
            Err(err) => debug!(error = %err, "Wishlist fetch failed"),
        }
    }

    /// Toggle `product_id`, notify the user, and on 401 redirect to login
    /// with `location` as the `refer` target.
    #[instrument(skip(self, location), fields(product_id = %product_id))]
    pub async fn toggle(&mut self, product_id: &ProductId, location: &Location) -> ToggleOutcome {
        let api = self.storefront.api();
        let result = self
            .guard
            .scope()
            .run(api.toggle_wishlist(product_id))
            .await;

        match result {
            Ok(update) => {
                self.wishlist = update.wishlist;
                let message = if update.message.trim().is_empty() {
                    UPDATED_FALLBACK_MESSAGE.to_string()
                } else {
                    update.message
                };
                self.storefront.notify(Notification::success(message));
                ToggleOutcome::Updated
            }
            Err(ApiError::Cancelled) => ToggleOutcome::Cancelled,
            Err(err) if err.is_unauthorized() => {
                let redirect = login_redirect(location);
                self.storefront
                    .notify(Notification::error(LOGIN_REQUIRED_MESSAGE));
                self.storefront.navigate_to(
                    NavigationRequest::push(redirect.clone())
                        .after(self.storefront.config().redirect_delay),
                );
                ToggleOutcome::LoginRequired { redirect }
            }
            Err(err) => {
                warn!(error = %err, "Wishlist toggle failed");
                let message = err.user_message(TOGGLE_FALLBACK_MESSAGE);
                self.storefront.notify(Notification::error(message.clone()));
                ToggleOutcome::Failed { message }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::ui::Recorder;

    fn toggle() -> (WishlistToggle, Recorder) {
        let config = ClientConfig::with_base_url("http://127.0.0.1:9/api/v1/").unwrap();
        let recorder = Recorder::new();
        let storefront = Storefront::with_recorder(config, &recorder).unwrap();
        (WishlistToggle::new(&storefront), recorder)
    }

    #[test]
    fn test_labels_follow_membership() {
        let (mut toggle, _) = toggle();
        toggle.wishlist = Wishlist::from(vec![ProductId::from("p1"), ProductId::from("p3")]);
        assert_eq!(toggle.label("p1"), SAVED_LABEL);
        assert_eq!(toggle.label("p3"), SAVED_LABEL);
        assert_eq!(toggle.label("p2"), SAVE_LABEL);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_wishlist_empty() {
        let (mut toggle, recorder) = toggle();
        toggle.load().await;
        assert!(toggle.wishlist().is_empty());
        assert!(recorder.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_uses_fallback_message() {
        let (mut toggle, recorder) = toggle();
        let outcome = toggle
            .toggle(&ProductId::from("p1"), &Location::parse("/products"))
            .await;
        assert_eq!(
            outcome,
            ToggleOutcome::Failed {
                message: TOGGLE_FALLBACK_MESSAGE.to_string()
            }
        );
        assert_eq!(
            recorder.notifications(),
            vec![Notification::error(TOGGLE_FALLBACK_MESSAGE)]
        );
        assert!(recorder.navigations().is_empty());
    }
}
