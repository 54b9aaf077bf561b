//! Product list and detail views.
//!
//! Both views fetch once per mount and move through three states:
//! loading, failed (with display text) and ready.

use tracing::{debug, instrument, warn};

use shopease_core::{Product, ProductId};

use crate::error::ApiError;
use crate::scope::ScopeGuard;
use crate::state::Storefront;
use crate::ui::{Location, Notification};
use crate::wishlist::{ToggleOutcome, WishlistToggle};

pub const LIST_ERROR_MESSAGE: &str = "Failed to fetch products. Please try again later.";
pub const EMPTY_LIST_MESSAGE: &str = "No products available.";
pub const ADDED_TO_CART_MESSAGE: &str = "Product added to cart successfully.";
pub const ADD_TO_CART_FAILED_MESSAGE: &str = "Failed to add product to cart.";
pub const OUT_OF_STOCK_LABEL: &str = "Out of stock";

/// Number of products shown in the home page's featured collection.
pub const FEATURED_COUNT: usize = 3;

/// Fetch state of a view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState<T> {
    #[default]
    Loading,
    /// Display text for the error.
    Failed(String),
    Ready(T),
}

impl<T> ViewState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Display text for a product's stock flag.
#[must_use]
pub fn stock_label(product: &Product) -> Option<&'static str> {
    if product.is_out_of_stock() {
        Some(OUT_OF_STOCK_LABEL)
    } else {
        None
    }
}

// =============================================================================
// Product List
// =============================================================================

/// The `/products` page: product grid plus wishlist toggles.
#[derive(Debug)]
pub struct ProductListView {
    storefront: Storefront,
    guard: ScopeGuard,
    state: ViewState<Vec<Product>>,
    wishlist: WishlistToggle,
}

impl ProductListView {
    #[must_use]
    pub fn new(storefront: &Storefront) -> Self {
        let guard = storefront.view_scope();
        let wishlist = WishlistToggle::with_guard(storefront, guard.scope().child().guard());
        Self {
            storefront: storefront.clone(),
            guard,
            state: ViewState::Loading,
            wishlist,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ViewState<Vec<Product>> {
        &self.state
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistToggle {
        &self.wishlist
    }

    /// The empty-state text, when the fetch succeeded with no products.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        match &self.state {
            ViewState::Ready(products) if products.is_empty() => Some(EMPTY_LIST_MESSAGE),
            _ => None,
        }
    }

    /// Fetch products and the wishlist concurrently.
    ///
    /// A cancelled fetch leaves the view in `Loading`.
    #[instrument(skip_all)]
    pub async fn load(&mut self) {
        let api = self.storefront.api();
        let scope = self.guard.scope();
        let (products, ()) = tokio::join!(scope.run(api.list_products()), self.wishlist.load());

        match products {
            Ok(products) => self.state = ViewState::Ready(products),
            Err(ApiError::Cancelled) => debug!("Product list fetch cancelled"),
            Err(err) => {
                warn!(error = %err, "Failed to fetch products");
                self.state = ViewState::Failed(LIST_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Forward a wishlist click from this page.
    pub async fn toggle_wishlist(
        &mut self,
        product_id: &ProductId,
        location: &Location,
    ) -> ToggleOutcome {
        self.wishlist.toggle(product_id, location).await
    }
}

// =============================================================================
// Product Detail
// =============================================================================

/// The `/product/:id` page.
#[derive(Debug)]
pub struct ProductDetailView {
    storefront: Storefront,
    guard: ScopeGuard,
    product_id: ProductId,
    state: ViewState<Product>,
}

impl ProductDetailView {
    #[must_use]
    pub fn new(storefront: &Storefront, product_id: ProductId) -> Self {
        Self {
            storefront: storefront.clone(),
            guard: storefront.view_scope(),
            product_id,
            state: ViewState::Loading,
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub const fn state(&self) -> &ViewState<Product> {
        &self.state
    }

    /// Fetch the product. On failure the server's message is shown verbatim,
    /// otherwise the error's own text.
    #[instrument(skip(self), fields(product_id = %self.product_id))]
    pub async fn load(&mut self) {
        let api = self.storefront.api();
        match self.guard.scope().run(api.get_product(&self.product_id)).await {
            Ok(product) => self.state = ViewState::Ready(product),
            Err(ApiError::Cancelled) => debug!("Product fetch cancelled"),
            Err(err) => {
                warn!(error = %err, "Failed to fetch product");
                let message = err
                    .server_message()
                    .map_or_else(|| err.to_string(), str::to_string);
                self.state = ViewState::Failed(message);
            }
        }
    }

    /// Add this product to the cart through the shared store.
    ///
    /// # Errors
    ///
    /// Returns the API error after the failure notification was shown.
    #[instrument(skip(self), fields(product_id = %self.product_id))]
    pub async fn add_to_cart(&self) -> Result<(), ApiError> {
        match self
            .storefront
            .cart()
            .add_item(self.guard.scope(), &self.product_id)
            .await
        {
            Ok(_) => {
                self.storefront
                    .notify(Notification::success(ADDED_TO_CART_MESSAGE));
                Ok(())
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled),
            Err(err) => {
                warn!(error = %err, "Failed to add product to cart");
                self.storefront
                    .notify(Notification::error(ADD_TO_CART_FAILED_MESSAGE));
                Err(err)
            }
        }
    }
}

// =============================================================================
// Featured Products
// =============================================================================

/// The first three products of the catalog for the home page.
///
/// Any failure yields an empty collection.
#[instrument(skip_all)]
pub async fn featured_products(storefront: &Storefront) -> Vec<Product> {
    let guard = storefront.view_scope();
    match guard.scope().run(storefront.api().list_products()).await {
        Ok(mut products) => {
            products.truncate(FEATURED_COUNT);
            products
        }
        Err(err) => {
            debug!(error = %err, "Failed to fetch featured products");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::ui::Recorder;

    fn storefront(recorder: &Recorder) -> Storefront {
        let config = ClientConfig::with_base_url("http://127.0.0.1:9/api/v1/").unwrap();
        Storefront::with_recorder(config, recorder).unwrap()
    }

    #[test]
    fn test_view_state_accessors() {
        let loading: ViewState<u8> = ViewState::default();
        assert!(loading.is_loading());
        assert_eq!(loading.data(), None);

        let failed: ViewState<u8> = ViewState::Failed("Nope".to_string());
        assert_eq!(failed.error(), Some("Nope"));

        let ready = ViewState::Ready(3_u8);
        assert_eq!(ready.data(), Some(&3));
        assert_eq!(ready.error(), None);
    }

    #[tokio::test]
    async fn test_list_failure_shows_generic_text() {
        let recorder = Recorder::new();
        let mut view = ProductListView::new(&storefront(&recorder));
        view.load().await;
        assert_eq!(view.state().error(), Some(LIST_ERROR_MESSAGE));
        assert_eq!(view.empty_message(), None);
        assert!(view.wishlist().wishlist().is_empty());
    }

    #[tokio::test]
    async fn test_detail_failure_falls_back_to_error_text() {
        let recorder = Recorder::new();
        let mut view = ProductDetailView::new(&storefront(&recorder), ProductId::from("p1"));
        view.load().await;
        let message = view.state().error().unwrap();
        assert!(message.starts_with("Network error"));
    }

    #[tokio::test]
    async fn test_add_to_cart_failure_notifies() {
        let recorder = Recorder::new();
        let view = ProductDetailView::new(&storefront(&recorder), ProductId::from("p1"));
        assert!(view.add_to_cart().await.is_err());
        assert_eq!(
            recorder.notifications(),
            vec![Notification::error(ADD_TO_CART_FAILED_MESSAGE)]
        );
    }

    #[tokio::test]
    async fn test_featured_products_empty_on_failure() {
        let recorder = Recorder::new();
        assert!(featured_products(&storefront(&recorder)).await.is_empty());
    }

    #[tokio::test]
    async fn test_torn_down_view_stays_loading() {
        let recorder = Recorder::new();
        let storefront = storefront(&recorder);
        let mut view = ProductListView::new(&storefront);
        storefront.shutdown();
        view.load().await;
        assert!(view.state().is_loading());
    }
}
