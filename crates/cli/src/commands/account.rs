//! Session, authentication, wishlist and cart commands.

use secrecy::ExposeSecret;

use shopease_client::Storefront;
use shopease_client::auth::{FormState, LoginForm, LoginView, RegisterForm, RegisterView};
use shopease_client::header::{Header, nav_links};
use shopease_client::session::SessionStatus;
use shopease_client::ui::Location;
use shopease_client::wishlist::{ToggleOutcome, WishlistToggle};
use shopease_core::ProductId;

use super::CommandError;
use crate::Credentials;

fn form_result(state: &FormState) -> Result<(), CommandError> {
    match state {
        FormState::Succeeded(_) => Ok(()),
        other => Err(CommandError::Rejected(
            other.message().unwrap_or("submission cancelled").to_string(),
        )),
    }
}

/// Sign in through the login form.
///
/// # Errors
///
/// Returns an error if validation fails or the service rejects the login.
pub async fn login(storefront: &Storefront, credentials: &Credentials) -> Result<(), CommandError> {
    let mut view = LoginView::new(storefront, Location::parse("/login"));
    view.form = LoginForm::new(
        credentials.email.clone(),
        credentials.password.expose_secret(),
    );
    form_result(view.submit().await)
}

/// Create an account through the registration form.
///
/// # Errors
///
/// Returns an error if validation fails or the service rejects the data.
pub async fn register(
    storefront: &Storefront,
    name: &str,
    credentials: &Credentials,
    phone: &str,
) -> Result<(), CommandError> {
    let mut view = RegisterView::new(storefront);
    view.form = RegisterForm::new(
        name,
        credentials.email.clone(),
        credentials.password.expose_secret(),
        phone,
    );
    let result = form_result(view.submit().await);
    if result.is_ok() {
        for (label, path) in RegisterView::links() {
            println!("{label}: {path}");
        }
    }
    result
}

/// End the session.
///
/// # Errors
///
/// Returns an error if the logout request fails.
pub async fn logout(storefront: &Storefront) -> Result<(), CommandError> {
    Header::new(storefront).logout().await?;
    Ok(())
}

/// Print the session status and the header links it implies.
pub async fn session(storefront: &Storefront) {
    let status = storefront.on_navigate(&Location::parse("/")).await;
    let label = match status {
        SessionStatus::Authenticated => "signed in",
        SessionStatus::Anonymous | SessionStatus::Unknown => "signed out",
    };
    println!("Session: {label}");

    let links = nav_links(status.is_authenticated(), storefront.cart().badge().await);
    let rendered: Vec<String> = links
        .iter()
        .map(|link| match link.badge {
            Some(count) => format!("{} ({count})", link.label),
            None => link.label.to_string(),
        })
        .collect();
    println!("{}", rendered.join(" | "));
}

/// Print the wishlist ids.
pub async fn wishlist(storefront: &Storefront) {
    let mut toggle = WishlistToggle::new(storefront);
    toggle.load().await;
    if toggle.wishlist().is_empty() {
        println!("Wishlist is empty.");
        return;
    }
    for id in toggle.wishlist().iter() {
        println!("{id}");
    }
}

/// Toggle a product's wishlist membership.
///
/// # Errors
///
/// Returns an error if the toggle did not go through.
pub async fn toggle_wishlist(storefront: &Storefront, id: &str) -> Result<(), CommandError> {
    let mut toggle = WishlistToggle::new(storefront);
    toggle.load().await;
    let product_id = ProductId::from(id);
    match toggle
        .toggle(&product_id, &Location::parse("/products"))
        .await
    {
        ToggleOutcome::Updated => {
            println!("{}: {}", product_id, toggle.label(id));
            Ok(())
        }
        ToggleOutcome::LoginRequired { .. } => Err(CommandError::Rejected(
            shopease_client::wishlist::LOGIN_REQUIRED_MESSAGE.to_string(),
        )),
        ToggleOutcome::Failed { message } => Err(CommandError::Rejected(message)),
        ToggleOutcome::Cancelled => Ok(()),
    }
}

/// Print the cart badge and line items.
pub async fn cart(storefront: &Storefront) {
    let snapshot = storefront.cart().snapshot().await;
    match storefront.cart().badge().await {
        Some(count) => println!("Cart: {count} item(s)"),
        None => {
            println!("Cart is empty.");
            return;
        }
    }
    for item in &snapshot.cart.items {
        println!("{}  x{}", item.product.id(), item.quantity);
    }
    if let Some(fetched_at) = snapshot.fetched_at {
        println!("Synced at {}", fetched_at.to_rfc3339());
    }
}
