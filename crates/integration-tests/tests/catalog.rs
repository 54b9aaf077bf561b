//! Product list, product detail, featured products and add-to-cart against
//! the fake commerce API.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;

use shopease_client::Storefront;
use shopease_client::auth::{LoginForm, LoginView};
use shopease_client::catalog::{
    ADD_TO_CART_FAILED_MESSAGE, ADDED_TO_CART_MESSAGE, EMPTY_LIST_MESSAGE, LIST_ERROR_MESSAGE,
    ProductDetailView, ProductListView, featured_products, stock_label,
};
use shopease_client::content::home_page;
use shopease_client::ui::{Location, Notification, Recorder};
use shopease_core::ProductId;
use shopease_integration_tests::{Endpoint, FakeApi, USER_EMAIL, USER_PASSWORD, seeded};

async fn sign_in(storefront: &Storefront) {
    let mut view = LoginView::new(storefront, Location::parse("/login"));
    view.form = LoginForm::new(USER_EMAIL, USER_PASSWORD);
    view.submit().await;
}

#[tokio::test]
async fn test_list_keeps_service_order() {
    let api = FakeApi::spawn().await;
    api.add_product("z9", "Zeta", "5.00");
    api.add_product("a1", "Alpha", "5.00");
    api.add_product("z9", "Zeta again", "6.00");
    let storefront = api.storefront(&Recorder::new());

    let mut view = ProductListView::new(&storefront);
    view.load().await;

    let ids: Vec<_> = view
        .state()
        .data()
        .unwrap()
        .iter()
        .map(|p| p.id.as_str().to_string())
        .collect();
    assert_eq!(ids, vec!["z9", "a1", "z9"]);
}

#[tokio::test]
async fn test_empty_list_shows_empty_state() {
    let api = FakeApi::spawn().await;
    let storefront = api.storefront(&Recorder::new());

    let mut view = ProductListView::new(&storefront);
    view.load().await;

    assert_eq!(view.empty_message(), Some(EMPTY_LIST_MESSAGE));
    assert!(view.state().error().is_none());
}

#[tokio::test]
async fn test_list_failure_shows_generic_message() {
    let api = seeded(2).await;
    api.fail(Endpoint::Products, 500, Some("database exploded"));
    let storefront = api.storefront(&Recorder::new());

    let mut view = ProductListView::new(&storefront);
    view.load().await;

    assert_eq!(view.state().error(), Some(LIST_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_malformed_list_is_an_error() {
    let api = FakeApi::spawn().await;
    api.set_raw_products(json!({ "items": [] }));
    let storefront = api.storefront(&Recorder::new());

    let mut view = ProductListView::new(&storefront);
    view.load().await;
    assert_eq!(view.state().error(), Some(LIST_ERROR_MESSAGE));

    api.set_raw_products(json!({ "products": [{ "_id": "p1", "name": "Bad", "price": -3 }] }));
    let mut view = ProductListView::new(&storefront);
    view.load().await;
    assert_eq!(view.state().error(), Some(LIST_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_numeric_prices_are_accepted() {
    let api = FakeApi::spawn().await;
    api.set_raw_products(json!({
        "products": [{ "_id": "p1", "name": "Tote", "price": 35.5, "inStock": true }]
    }));
    let storefront = api.storefront(&Recorder::new());

    let mut view = ProductListView::new(&storefront);
    view.load().await;
    let product = &view.state().data().unwrap()[0];
    assert_eq!(product.price.to_string(), "$35.50");
    assert_eq!(stock_label(product), None);
}

#[tokio::test]
async fn test_detail_shows_product() {
    let api = seeded(2).await;
    api.set_out_of_stock("p2");
    let storefront = api.storefront(&Recorder::new());

    let mut view = ProductDetailView::new(&storefront, ProductId::from("p2"));
    view.load().await;

    let product = view.state().data().unwrap();
    assert_eq!(product.name, "Product 2");
    assert_eq!(product.price.to_string(), "$29.99");
    assert_eq!(stock_label(product), Some("Out of stock"));
}

#[tokio::test]
async fn test_detail_failure_shows_server_message_verbatim() {
    let api = seeded(1).await;
    let storefront = api.storefront(&Recorder::new());

    let mut view = ProductDetailView::new(&storefront, ProductId::from("missing"));
    view.load().await;
    assert_eq!(view.state().error(), Some("Product not found"));

    api.fail(Endpoint::Product, 503, Some("Catalog is being rebuilt"));
    let mut view = ProductDetailView::new(&storefront, ProductId::from("p1"));
    view.load().await;
    assert_eq!(view.state().error(), Some("Catalog is being rebuilt"));
}

#[tokio::test]
async fn test_detail_failure_without_message_uses_error_text() {
    let api = seeded(1).await;
    api.fail(Endpoint::Product, 502, None);
    let storefront = api.storefront(&Recorder::new());

    let mut view = ProductDetailView::new(&storefront, ProductId::from("p1"));
    view.load().await;
    assert_eq!(view.state().error(), Some("API error: 502"));
}

#[tokio::test]
async fn test_torn_down_view_stays_loading() {
    let api = seeded(1).await;
    api.delay_next(Endpoint::Product, Duration::from_millis(500));
    let storefront = api.storefront(&Recorder::new());

    let mut view = ProductDetailView::new(&storefront, ProductId::from("p1"));
    let closer = storefront.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        closer.shutdown();
    });
    view.load().await;

    assert!(view.state().is_loading());
}

#[tokio::test]
async fn test_add_to_cart_updates_badge() {
    let api = seeded(2).await;
    let recorder = Recorder::new();
    let storefront = api.storefront(&recorder);
    sign_in(&storefront).await;

    let view = ProductDetailView::new(&storefront, ProductId::from("p1"));
    view.add_to_cart().await.unwrap();

    assert_eq!(
        recorder.notifications().last().unwrap(),
        &Notification::success(ADDED_TO_CART_MESSAGE)
    );
    assert_eq!(storefront.cart().badge().await, Some(1));

    // Adding again bumps the quantity; the line count is unchanged.
    view.add_to_cart().await.unwrap();
    assert_eq!(storefront.cart().badge().await, Some(1));
    let snapshot = storefront.cart().snapshot().await;
    assert_eq!(snapshot.cart.items[0].quantity, 2);
}

#[tokio::test]
async fn test_add_to_cart_failure_notifies_without_change() {
    let api = seeded(1).await;
    let recorder = Recorder::new();
    let storefront = api.storefront(&recorder);

    let view = ProductDetailView::new(&storefront, ProductId::from("p1"));
    let err = view.add_to_cart().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(
        recorder.notifications(),
        vec![Notification::error(ADD_TO_CART_FAILED_MESSAGE)]
    );
    assert_eq!(storefront.cart().badge().await, None);
}

#[tokio::test]
async fn test_featured_products_are_first_three() {
    let api = seeded(5).await;
    let storefront = api.storefront(&Recorder::new());

    let featured = featured_products(&storefront).await;
    let names: Vec<_> = featured.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Product 1", "Product 2", "Product 3"]);

    api.fail(Endpoint::Products, 500, None);
    assert!(featured_products(&storefront).await.is_empty());
}

#[tokio::test]
async fn test_home_page_includes_featured() {
    let api = seeded(2).await;
    let storefront = api.storefront(&Recorder::new());

    let page = home_page(&storefront).await;
    assert_eq!(page.featured.len(), 2);
    assert_eq!(page.hero.title, "Timeless Essentials");
    assert_eq!(page.join_us.link.path, "/register");
}
