//! Session probe, cart synchronisation and header behaviour against the
//! fake commerce API.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use shopease_client::auth::{LoginForm, LoginView};
use shopease_client::cart::SyncOutcome;
use shopease_client::header::Header;
use shopease_client::scope::ViewScope;
use shopease_client::session::SessionStatus;
use shopease_client::ui::{Location, Recorder};
use shopease_client::Storefront;
use shopease_integration_tests::{Endpoint, USER_EMAIL, USER_PASSWORD, seeded};

async fn sign_in(storefront: &Storefront) {
    let mut view = LoginView::new(storefront, Location::parse("/login"));
    view.form = LoginForm::new(USER_EMAIL, USER_PASSWORD);
    view.submit().await;
    assert!(storefront.session().is_authenticated());
}

#[tokio::test]
async fn test_probe_reports_anonymous_without_cookie() {
    let api = seeded(1).await;
    let storefront = api.storefront(&Recorder::new());

    let status = storefront.on_navigate(&Location::parse("/")).await;
    assert_eq!(status, SessionStatus::Anonymous);
    assert_eq!(api.hits(Endpoint::Profile), 1);
}

#[tokio::test]
async fn test_probe_reports_authenticated_after_login() {
    let api = seeded(1).await;
    let storefront = api.storefront(&Recorder::new());
    sign_in(&storefront).await;

    // Force the probe to re-derive the state from the cookie.
    storefront.session().set(SessionStatus::Unknown);
    let status = storefront.on_navigate(&Location::parse("/products")).await;
    assert_eq!(status, SessionStatus::Authenticated);
}

#[tokio::test]
async fn test_probe_runs_on_every_navigation() {
    let api = seeded(1).await;
    let storefront = api.storefront(&Recorder::new());
    for path in ["/", "/about", "/products"] {
        storefront.on_navigate(&Location::parse(path)).await;
    }
    assert_eq!(api.hits(Endpoint::Profile), 3);
}

#[tokio::test]
async fn test_server_error_on_probe_means_anonymous() {
    let api = seeded(1).await;
    let storefront = api.storefront(&Recorder::new());
    sign_in(&storefront).await;

    api.fail(Endpoint::Profile, 500, Some("boom"));
    let status = storefront.on_navigate(&Location::parse("/")).await;
    assert_eq!(status, SessionStatus::Anonymous);
}

#[tokio::test]
async fn test_mount_syncs_cart_badge() {
    let api = seeded(3).await;
    api.set_cart(USER_EMAIL, &["p1", "p2", "p3"]);
    let storefront = api.storefront(&Recorder::new());
    sign_in(&storefront).await;

    let (status, outcome) = storefront.on_mount().await;
    assert_eq!(status, SessionStatus::Authenticated);
    assert_eq!(outcome, SyncOutcome::Applied);
    assert_eq!(storefront.cart().item_count().await, 3);
    assert_eq!(storefront.cart().badge().await, Some(3));
}

#[tokio::test]
async fn test_empty_cart_has_no_badge() {
    let api = seeded(1).await;
    api.set_cart(USER_EMAIL, &[]);
    let storefront = api.storefront(&Recorder::new());
    sign_in(&storefront).await;

    storefront.on_mount().await;
    assert_eq!(storefront.cart().badge().await, None);
}

#[tokio::test]
async fn test_signed_out_mount_leaves_cart_empty() {
    let api = seeded(1).await;
    let recorder = Recorder::new();
    let storefront = api.storefront(&recorder);

    let (status, outcome) = storefront.on_mount().await;
    assert_eq!(status, SessionStatus::Anonymous);
    assert_eq!(outcome, SyncOutcome::Failed);
    assert_eq!(storefront.cart().badge().await, None);
    // Failures on mount are silent.
    assert!(recorder.notifications().is_empty());
    assert_eq!(api.hits(Endpoint::Cart), 1);
}

#[tokio::test]
async fn test_stale_cart_sync_never_overwrites_newer() {
    let api = seeded(3).await;
    api.set_cart(USER_EMAIL, &["p1"]);
    let storefront = api.storefront(&Recorder::new());
    sign_in(&storefront).await;

    // First sync answers with one item but arrives late.
    api.delay_next(Endpoint::Cart, Duration::from_millis(300));
    let slow = {
        let storefront = storefront.clone();
        tokio::spawn(async move { storefront.cart().sync(&ViewScope::new()).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Second sync is issued later and sees two items.
    api.set_cart(USER_EMAIL, &["p1", "p2"]);
    let fast = storefront.cart().sync(&ViewScope::new()).await;
    assert_eq!(fast, SyncOutcome::Applied);

    assert_eq!(slow.await.unwrap(), SyncOutcome::Stale);
    assert_eq!(storefront.cart().item_count().await, 2);
}

#[tokio::test]
async fn test_teardown_cancels_cart_sync() {
    let api = seeded(1).await;
    let storefront = api.storefront(&Recorder::new());
    sign_in(&storefront).await;
    api.set_cart(USER_EMAIL, &["p1"]);

    api.delay_next(Endpoint::Cart, Duration::from_millis(500));
    let scope = ViewScope::new();
    let sync = {
        let storefront = storefront.clone();
        let scope = scope.clone();
        tokio::spawn(async move { storefront.cart().sync(&scope).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    scope.teardown();

    assert_eq!(sync.await.unwrap(), SyncOutcome::Cancelled);
    assert_eq!(storefront.cart().badge().await, None);
}

#[tokio::test]
async fn test_login_after_mount_refreshes_cart() {
    let api = seeded(2).await;
    api.set_cart(USER_EMAIL, &["p1", "p2"]);
    let storefront = api.storefront(&Recorder::new());

    // Mounted signed out: the cart fetch fails and the badge stays empty.
    storefront.on_mount().await;
    assert_eq!(storefront.cart().badge().await, None);

    sign_in(&storefront).await;
    assert_eq!(storefront.cart().badge().await, Some(2));
    assert_eq!(api.hits(Endpoint::Cart), 2);
}

#[tokio::test]
async fn test_header_links_follow_session_and_badge() {
    let api = seeded(2).await;
    api.set_cart(USER_EMAIL, &["p1", "p2"]);
    let storefront = api.storefront(&Recorder::new());
    let header = Header::new(&storefront);

    storefront.on_mount().await;
    let labels: Vec<_> = header.links().await.iter().map(|l| l.label).collect();
    assert!(labels.contains(&"Login"));
    assert!(!labels.contains(&"Cart"));

    sign_in(&storefront).await;
    storefront.on_mount().await;
    let links = header.links().await;
    let cart = links.iter().find(|l| l.label == "Cart").unwrap();
    assert_eq!(cart.badge, Some(2));
    assert!(links.iter().any(|l| l.label == "My Profile"));
}

#[tokio::test]
async fn test_logout_ends_session_and_goes_to_login() {
    let api = seeded(1).await;
    api.set_cart(USER_EMAIL, &["p1"]);
    let recorder = Recorder::new();
    let storefront = api.storefront(&recorder);
    sign_in(&storefront).await;
    storefront.on_mount().await;
    assert_eq!(api.active_sessions(), 1);

    Header::new(&storefront).logout().await.unwrap();

    assert!(!storefront.session().is_authenticated());
    assert_eq!(storefront.cart().badge().await, None);
    assert_eq!(api.active_sessions(), 0);
    assert_eq!(recorder.last_navigation().unwrap().to, "/login");

    let status = storefront.on_navigate(&Location::parse("/")).await;
    assert_eq!(status, SessionStatus::Anonymous);
}

#[tokio::test]
async fn test_failed_logout_keeps_state() {
    let api = seeded(1).await;
    let recorder = Recorder::new();
    let storefront = api.storefront(&recorder);
    sign_in(&storefront).await;
    let navigations_before = recorder.navigations().len();

    api.fail(Endpoint::Logout, 500, None);
    assert!(Header::new(&storefront).logout().await.is_err());
    assert!(storefront.session().is_authenticated());
    assert_eq!(recorder.navigations().len(), navigations_before);
}
