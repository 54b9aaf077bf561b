//! Header navigation and logout.

use tracing::{error, instrument};

use crate::error::ApiError;
use crate::session::SessionStatus;
use crate::state::Storefront;
use crate::ui::NavigationRequest;
use crate::ui::location::LOGIN_PATH;

/// One header link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
    /// Count shown next to the label (cart only).
    pub badge: Option<usize>,
}

impl NavLink {
    const fn new(label: &'static str, path: &'static str) -> Self {
        Self {
            label,
            path,
            badge: None,
        }
    }
}

/// Header links for a session state and cart badge.
///
/// Home, About and Products always; then My Profile and Cart when signed in,
/// Login and Register otherwise. The cart badge is omitted when `None`.
#[must_use]
pub fn nav_links(authenticated: bool, cart_badge: Option<usize>) -> Vec<NavLink> {
    let mut links = vec![
        NavLink::new("Home", "/"),
        NavLink::new("About", "/about"),
        NavLink::new("Products", "/products"),
    ];
    if authenticated {
        links.push(NavLink::new("My Profile", "/profile"));
        links.push(NavLink {
            badge: cart_badge,
            ..NavLink::new("Cart", "/cart")
        });
    } else {
        links.push(NavLink::new("Login", LOGIN_PATH));
        links.push(NavLink::new("Register", "/register"));
    }
    links
}

/// The site header.
#[derive(Debug, Clone)]
pub struct Header {
    storefront: Storefront,
}

impl Header {
    #[must_use]
    pub fn new(storefront: &Storefront) -> Self {
        Self {
            storefront: storefront.clone(),
        }
    }

    /// Links for the current session and cached cart.
    pub async fn links(&self) -> Vec<NavLink> {
        let authenticated = self.storefront.session().is_authenticated();
        let badge = self.storefront.cart().badge().await;
        nav_links(authenticated, badge)
    }

    /// End the session and go to the login page.
    ///
    /// # Errors
    ///
    /// Returns the API error after logging it; session state is unchanged.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let guard = self.storefront.view_scope();
        if let Err(err) = guard.scope().run(self.storefront.api().logout()).await {
            error!(error = %err, "Logout failed");
            return Err(err);
        }
        self.storefront.session().set(SessionStatus::Anonymous);
        self.storefront.cart().clear().await;
        self.storefront
            .navigate_to(NavigationRequest::push(LOGIN_PATH));
        Ok(())
    }
}
