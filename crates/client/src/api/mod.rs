//! Commerce API client adapter.
//!
//! # Architecture
//!
//! - One `reqwest::Client` per process with a cookie store: the session
//!   cookie set by `user/login` is the only credential and is sent with
//!   every later request
//! - Fixed base address from [`ClientConfig`]; endpoint paths are relative
//!   (`user/profile`) and joined beneath it
//! - Default `Content-Type: application/json` header
//! - Every success body is decoded into a typed struct from [`responses`]
//!   and validated; schema problems surface as [`ApiError::Malformed`]
//!
//! # Example
//!
//! ```rust,ignore
//! use shopease_client::api::ApiClient;
//!
//! let api = ApiClient::new(&config)?;
//! let products = api.list_products().await?;
//! let wishlist = api.toggle_wishlist(&products[0].id).await?;
//! ```

pub mod responses;

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use shopease_core::{Cart, Product, ProductId, Wishlist};

use crate::config::ClientConfig;
use crate::error::ApiError;

use responses::{
    AddToCartRequest, CartResponse, ErrorBody, LoginRequest, MessageResponse, ProductResponse,
    ProductsResponse, RegisterRequest, Validate, WishlistResponse, WishlistToggleRequest,
    WishlistToggleResponse,
};

/// Endpoint paths, relative to the API base address.
pub mod endpoints {
    pub const PROFILE: &str = "user/profile";
    pub const LOGOUT: &str = "user/logout";
    pub const LOGIN: &str = "user/login";
    pub const REGISTER: &str = "user/register";
    pub const WISHLIST: &str = "user/wishlist";
    pub const WISHLIST_TOGGLE: &str = "user/add-to-wishlist";
    pub const PRODUCTS: &str = "product/get";
    pub const PRODUCT: &str = "product/get/:id";
    pub const CART: &str = "cart/get";
    pub const CART_ADD: &str = "cart/add";
}

/// Outcome of a wishlist toggle: the authoritative set plus the server's
/// confirmation text.
#[derive(Debug, Clone)]
pub struct WishlistUpdate {
    pub wishlist: Wishlist,
    pub message: String,
}

/// Outcome of a cart mutation.
#[derive(Debug, Clone)]
pub struct CartUpdate {
    pub cart: Cart,
    pub message: Option<String>,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the ShopEase commerce API.
///
/// Cheaply cloneable; clones share the connection pool and cookie jar, so a
/// login through one clone authenticates all of them.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
            }),
        })
    }

    /// The base address endpoint paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and return the raw response if its status is a success.
    ///
    /// Non-success statuses are mapped to `Unauthorized` or `Api`, carrying
    /// the optional `message` from the error body.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path)?;
        let mut request = self.inner.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty());

        debug!(
            status = %status,
            message = message.as_deref().unwrap_or(""),
            "API returned non-success status"
        );

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized { message });
        }
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Send a request and decode plus validate the success body.
    async fn execute<T, B>(
        &self,
        method: Method,
        path: &str,
        endpoint: &'static str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Validate,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        let text = response.text().await?;

        let parsed: T = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(
                endpoint,
                error = %e,
                body = %text.chars().take(200).collect::<String>(),
                "Failed to decode API response"
            );
            ApiError::Malformed {
                endpoint,
                reason: e.to_string(),
            }
        })?;

        parsed
            .validate()
            .map_err(|reason| ApiError::Malformed { endpoint, reason })?;

        Ok(parsed)
    }

    // =========================================================================
    // Session Methods
    // =========================================================================

    /// Probe the current session. Success means the cookie is valid.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when not signed in, or any transport error.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<(), ApiError> {
        self.send::<()>(Method::GET, endpoints::PROFILE, None)
            .await
            .map(|_| ())
    }

    /// Sign in; the service sets the session cookie on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let body = LoginRequest { email, password };
        let response: MessageResponse = self
            .execute(Method::POST, endpoints::LOGIN, endpoints::LOGIN, Some(&body))
            .await?;
        Ok(response.message)
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects the data.
    #[instrument(skip(self, password, phone))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: &str,
    ) -> Result<String, ApiError> {
        let body = RegisterRequest {
            name,
            email,
            password,
            phone,
        };
        let response: MessageResponse = self
            .execute(
                Method::POST,
                endpoints::REGISTER,
                endpoints::REGISTER,
                Some(&body),
            )
            .await?;
        Ok(response.message)
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let empty = serde_json::json!({});
        self.send(Method::POST, endpoints::LOGOUT, Some(&empty))
            .await
            .map(|_| ())
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// List all products in service order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let response: ProductsResponse = self
            .execute::<_, ()>(Method::GET, endpoints::PRODUCTS, endpoints::PRODUCTS, None)
            .await?;
        debug!(count = response.products.len(), "Fetched products");
        Ok(response.products)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist, the request fails or
    /// the body is malformed.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let path = format!(
            "{}/{}",
            endpoints::PRODUCTS,
            urlencoding::encode(id.as_str())
        );
        let response: ProductResponse = self
            .execute::<_, ()>(Method::GET, &path, endpoints::PRODUCT, None)
            .await?;
        Ok(response.product)
    }

    // =========================================================================
    // Wishlist Methods
    // =========================================================================

    /// Fetch the signed-in user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when not signed in, or any other API error.
    #[instrument(skip(self))]
    pub async fn wishlist(&self) -> Result<Wishlist, ApiError> {
        let response: WishlistResponse = self
            .execute::<_, ()>(Method::GET, endpoints::WISHLIST, endpoints::WISHLIST, None)
            .await?;
        Ok(response.wishlist)
    }

    /// Toggle a product's wishlist membership.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when not signed in, or any other API error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn toggle_wishlist(&self, product_id: &ProductId) -> Result<WishlistUpdate, ApiError> {
        let body = WishlistToggleRequest { product_id };
        let response: WishlistToggleResponse = self
            .execute(
                Method::POST,
                endpoints::WISHLIST_TOGGLE,
                endpoints::WISHLIST_TOGGLE,
                Some(&body),
            )
            .await?;
        Ok(WishlistUpdate {
            wishlist: response.wishlist,
            message: response.message,
        })
    }

    // =========================================================================
    // Cart Methods (never cached here - see CartStore)
    // =========================================================================

    /// Fetch the cart for the current credentials.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when not signed in, or any other API error.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<Cart, ApiError> {
        let response: CartResponse = self
            .execute::<_, ()>(Method::GET, endpoints::CART, endpoints::CART, None)
            .await?;
        Ok(response.cart)
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: &ProductId) -> Result<CartUpdate, ApiError> {
        let body = AddToCartRequest {
            product_id,
            quantity: 1,
        };
        let response: CartResponse = self
            .execute(
                Method::POST,
                endpoints::CART_ADD,
                endpoints::CART_ADD,
                Some(&body),
            )
            .await?;
        Ok(CartUpdate {
            cart: response.cart,
            message: response.message,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ClientConfig::with_base_url(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_urls_join_under_base() {
        let api = client("http://localhost:5000/api/v1");
        assert_eq!(
            api.url(endpoints::PROFILE).unwrap().as_str(),
            "http://localhost:5000/api/v1/user/profile"
        );
        assert_eq!(
            api.url(endpoints::WISHLIST_TOGGLE).unwrap().as_str(),
            "http://localhost:5000/api/v1/user/add-to-wishlist"
        );
    }

    #[test]
    fn test_debug_shows_base_url() {
        let api = client("https://api.example.com/api/v1/");
        let debug = format!("{api:?}");
        assert!(debug.contains("https://api.example.com/api/v1/"));
    }

    #[tokio::test]
    async fn test_transport_error_when_unreachable() {
        // Port 9 (discard) on localhost is not expected to run an HTTP server.
        let api = client("http://127.0.0.1:9/api/v1/");
        let err = api.list_products().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(err.server_message().is_none());
    }
}
