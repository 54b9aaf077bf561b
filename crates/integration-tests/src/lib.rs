//! Integration tests for the ShopEase client.
//!
//! [`FakeApi`] is an in-process stand-in for the commerce API: an axum
//! server on an ephemeral port that implements every endpoint the client
//! calls, keeps users, sessions, wishlists and carts in memory, and lets a
//! test inject failures and delays per endpoint.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopease-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let api = FakeApi::spawn().await;
//! api.add_product("p1", "Canvas Tote", "35.00");
//! api.add_user("ada@example.com", "hunter2");
//!
//! let recorder = Recorder::new();
//! let storefront = api.storefront(&recorder);
//! ```

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use uuid::Uuid;

use shopease_client::ui::Recorder;
use shopease_client::{ClientConfig, Storefront};
use shopease_core::{Cart, CartItem, Price, Product, ProductId, ProductRef};

const SESSION_COOKIE: &str = "sid";

/// Delay used for redirects in tests so nothing waits 1.5 s.
pub const TEST_REDIRECT_DELAY: Duration = Duration::from_millis(10);

/// Endpoints the fake serves, for failure and delay injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Profile,
    Login,
    Register,
    Logout,
    Products,
    Product,
    Wishlist,
    WishlistToggle,
    Cart,
    CartAdd,
}

#[derive(Debug, Clone)]
struct Failure {
    status: StatusCode,
    message: Option<String>,
}

#[derive(Debug, Clone)]
struct User {
    password: String,
}

#[derive(Debug, Default)]
struct FakeState {
    products: Vec<Product>,
    users: HashMap<String, User>,
    /// session token -> email
    sessions: HashMap<String, String>,
    wishlists: HashMap<String, Vec<ProductId>>,
    carts: HashMap<String, Cart>,
    failures: HashMap<Endpoint, Failure>,
    delays: HashMap<Endpoint, VecDeque<Duration>>,
    hits: HashMap<Endpoint, usize>,
    /// Raw product list body overriding the catalog (schema tests).
    raw_products: Option<Value>,
}

impl FakeState {
    fn user_for(&self, headers: &HeaderMap) -> Option<String> {
        let token = session_token(headers)?;
        self.sessions.get(&token).cloned()
    }
}

type Shared = Arc<Mutex<FakeState>>;

fn lock(state: &Shared) -> MutexGuard<'_, FakeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn unauthorized() -> Response {
    message(StatusCode::UNAUTHORIZED, "Unauthorized, please login")
}

fn cart_json(cart: &Cart) -> Value {
    json!({ "items": cart.items })
}

/// Count the hit, pick up any injected failure and delay, build the response
/// from the state at arrival time, then wait out the delay.
async fn respond(
    state: &Shared,
    endpoint: Endpoint,
    handler: impl FnOnce(&mut FakeState) -> Response,
) -> Response {
    let (delay, response) = {
        let mut guard = lock(state);
        *guard.hits.entry(endpoint).or_default() += 1;
        let delay = guard
            .delays
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        let response = match guard.failures.get(&endpoint).cloned() {
            Some(Failure {
                status,
                message: Some(text),
            }) => message(status, &text),
            Some(Failure {
                status,
                message: None,
            }) => (status, Json(json!({}))).into_response(),
            None => handler(&mut guard),
        };
        (delay, response)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    response
}

// =============================================================================
// Handlers
// =============================================================================

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    respond(&state, Endpoint::Profile, |s| match s.user_for(&headers) {
        Some(email) => Json(json!({ "user": { "email": email } })).into_response(),
        None => unauthorized(),
    })
    .await
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(state): State<Shared>, Json(body): Json<LoginBody>) -> Response {
    respond(&state, Endpoint::Login, |s| {
        let valid = s
            .users
            .get(&body.email)
            .is_some_and(|user| user.password == body.password);
        if !valid {
            return message(StatusCode::UNAUTHORIZED, "Invalid email or password");
        }
        let token = Uuid::new_v4().to_string();
        s.sessions.insert(token.clone(), body.email);
        (
            [(SET_COOKIE, format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly"))],
            Json(json!({ "message": "Login successful" })),
        )
            .into_response()
    })
    .await
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
    phone: String,
}

async fn register(State(state): State<Shared>, Json(body): Json<RegisterBody>) -> Response {
    respond(&state, Endpoint::Register, |s| {
        if body.name.is_empty() || body.phone.is_empty() {
            return message(StatusCode::BAD_REQUEST, "All fields are required");
        }
        if s.users.contains_key(&body.email) {
            return message(StatusCode::BAD_REQUEST, "User already exists");
        }
        s.users.insert(
            body.email,
            User {
                password: body.password,
            },
        );
        (
            StatusCode::CREATED,
            Json(json!({ "message": "User registered successfully" })),
        )
            .into_response()
    })
    .await
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    respond(&state, Endpoint::Logout, |s| {
        if let Some(token) = session_token(&headers) {
            s.sessions.remove(&token);
        }
        (
            [(SET_COOKIE, format!("{SESSION_COOKIE}=; Path=/; Max-Age=0"))],
            Json(json!({ "message": "Logged out successfully" })),
        )
            .into_response()
    })
    .await
}

async fn products(State(state): State<Shared>) -> Response {
    respond(&state, Endpoint::Products, |s| match &s.raw_products {
        Some(raw) => Json(raw.clone()).into_response(),
        None => Json(json!({ "products": s.products })).into_response(),
    })
    .await
}

async fn product(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    respond(&state, Endpoint::Product, |s| {
        match s.products.iter().find(|p| p.id.as_str() == id) {
            Some(product) => Json(json!({ "product": product })).into_response(),
            None => message(StatusCode::NOT_FOUND, "Product not found"),
        }
    })
    .await
}

async fn wishlist(State(state): State<Shared>, headers: HeaderMap) -> Response {
    respond(&state, Endpoint::Wishlist, |s| {
        let Some(email) = s.user_for(&headers) else {
            return unauthorized();
        };
        let ids = s.wishlists.get(&email).cloned().unwrap_or_default();
        Json(json!({ "wishlist": ids })).into_response()
    })
    .await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductBody {
    product_id: String,
}

async fn toggle_wishlist(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<ProductBody>,
) -> Response {
    respond(&state, Endpoint::WishlistToggle, |s| {
        let Some(email) = s.user_for(&headers) else {
            return unauthorized();
        };
        let ids = s.wishlists.entry(email).or_default();
        let text = if let Some(pos) = ids.iter().position(|id| id.as_str() == body.product_id) {
            ids.remove(pos);
            "Product removed from wishlist"
        } else {
            ids.push(ProductId::new(body.product_id));
            "Product added to wishlist"
        };
        Json(json!({ "wishlist": ids, "message": text })).into_response()
    })
    .await
}

async fn cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    respond(&state, Endpoint::Cart, |s| {
        let Some(email) = s.user_for(&headers) else {
            return unauthorized();
        };
        let cart = s.carts.get(&email).cloned().unwrap_or_default();
        Json(json!({ "cart": cart_json(&cart) })).into_response()
    })
    .await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartBody {
    product_id: String,
    quantity: u32,
}

async fn add_to_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<AddToCartBody>,
) -> Response {
    respond(&state, Endpoint::CartAdd, |s| {
        let Some(email) = s.user_for(&headers) else {
            return unauthorized();
        };
        if !s.products.iter().any(|p| p.id.as_str() == body.product_id) {
            return message(StatusCode::NOT_FOUND, "Product not found");
        }
        let cart = s.carts.entry(email).or_default();
        if let Some(item) = cart
            .items
            .iter_mut()
            .find(|item| item.product.id().as_str() == body.product_id)
        {
            item.quantity += body.quantity;
        } else {
            cart.items.push(CartItem {
                id: Some(Uuid::new_v4().simple().to_string().into()),
                product: ProductRef::Id(ProductId::new(body.product_id)),
                quantity: body.quantity,
            });
        }
        Json(json!({ "cart": cart_json(cart), "message": "Product added to cart" })).into_response()
    })
    .await
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/user/profile", get(profile))
        .route("/api/v1/user/login", post(login))
        .route("/api/v1/user/register", post(register))
        .route("/api/v1/user/logout", post(logout))
        .route("/api/v1/user/wishlist", get(wishlist))
        .route("/api/v1/user/add-to-wishlist", post(toggle_wishlist))
        .route("/api/v1/product/get", get(products))
        .route("/api/v1/product/get/{id}", get(product))
        .route("/api/v1/cart/get", get(cart))
        .route("/api/v1/cart/add", post(add_to_cart))
        .with_state(state)
}

// =============================================================================
// FakeApi
// =============================================================================

/// A running fake commerce API. The server stops when this is dropped.
pub struct FakeApi {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeApi {
    /// Start a server on an ephemeral localhost port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn spawn() -> Self {
        let state = Shared::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake API address");

        let app = router(state.clone());
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("fake API stopped: {e}");
            }
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base address the client should use (ends in `/api/v1/`).
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1/", self.addr)
    }

    /// Client configuration pointing at this server with a short redirect delay.
    ///
    /// # Panics
    ///
    /// Panics if the base address is rejected (never for a bound socket).
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        let mut config =
            ClientConfig::with_base_url(&self.base_url()).expect("fake API address is valid");
        config.redirect_delay = TEST_REDIRECT_DELAY;
        config
    }

    /// A storefront context talking to this server.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn storefront(&self, recorder: &Recorder) -> Storefront {
        Storefront::with_recorder(self.config(), recorder).expect("Failed to build storefront")
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        lock(&self.state)
    }

    /// Add a product to the catalog. `price` is a decimal string.
    ///
    /// # Panics
    ///
    /// Panics if `price` is not a decimal.
    pub fn add_product(&self, id: &str, name: &str, price: &str) {
        let amount = Decimal::from_str(price).expect("price must be a decimal");
        self.state().products.push(Product {
            id: ProductId::from(id),
            name: name.to_string(),
            brand: "Timeless".to_string(),
            category: "Accessories".to_string(),
            price: Price::usd(amount),
            description: format!("{name} description"),
            image: format!("/images/{id}.jpg"),
            in_stock: true,
        });
    }

    /// Mark a product out of stock.
    pub fn set_out_of_stock(&self, id: &str) {
        if let Some(product) = self.state().products.iter_mut().find(|p| p.id.as_str() == id) {
            product.in_stock = false;
        }
    }

    /// Serve this body from `product/get` instead of the catalog.
    pub fn set_raw_products(&self, body: Value) {
        self.state().raw_products = Some(body);
    }

    pub fn add_user(&self, email: &str, password: &str) {
        self.state().users.insert(
            email.to_string(),
            User {
                password: password.to_string(),
            },
        );
    }

    #[must_use]
    pub fn has_user(&self, email: &str) -> bool {
        self.state().users.contains_key(email)
    }

    /// Replace a user's cart with one line per product id.
    pub fn set_cart(&self, email: &str, product_ids: &[&str]) {
        let cart = Cart {
            items: product_ids
                .iter()
                .map(|id| CartItem {
                    id: None,
                    product: ProductRef::Id(ProductId::from(*id)),
                    quantity: 1,
                })
                .collect(),
        };
        self.state().carts.insert(email.to_string(), cart);
    }

    pub fn set_wishlist(&self, email: &str, product_ids: &[&str]) {
        self.state().wishlists.insert(
            email.to_string(),
            product_ids.iter().map(|id| ProductId::from(*id)).collect(),
        );
    }

    #[must_use]
    pub fn wishlist_of(&self, email: &str) -> Vec<String> {
        self.state()
            .wishlists
            .get(email)
            .map(|ids| ids.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    /// Make `endpoint` answer `status` with an optional `message` body.
    pub fn fail(&self, endpoint: Endpoint, status: u16, message: Option<&str>) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.state().failures.insert(
            endpoint,
            Failure {
                status,
                message: message.map(str::to_string),
            },
        );
    }

    /// Stop injecting failures on `endpoint`.
    pub fn recover(&self, endpoint: Endpoint) {
        self.state().failures.remove(&endpoint);
    }

    /// Delay the next request to `endpoint`. Delays queue up in order.
    pub fn delay_next(&self, endpoint: Endpoint, delay: Duration) {
        self.state()
            .delays
            .entry(endpoint)
            .or_default()
            .push_back(delay);
    }

    /// Requests `endpoint` has received so far.
    #[must_use]
    pub fn hits(&self, endpoint: Endpoint) -> usize {
        self.state().hits.get(&endpoint).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.state().sessions.len()
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Spawn a fake API with a catalog of `count` products `p1..=pN` and a
/// registered user `ada@example.com` / `hunter2`.
pub async fn seeded(count: usize) -> FakeApi {
    let api = FakeApi::spawn().await;
    for i in 1..=count {
        api.add_product(&format!("p{i}"), &format!("Product {i}"), &format!("{i}9.99"));
    }
    api.add_user(USER_EMAIL, USER_PASSWORD);
    api
}

pub const USER_EMAIL: &str = "ada@example.com";
pub const USER_PASSWORD: &str = "hunter2";
