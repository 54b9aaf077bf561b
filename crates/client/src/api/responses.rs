//! Wire types for commerce API request and response bodies.
//!
//! Every success body is decoded into one of these structs and then passed
//! through [`Validate`] before it leaves the adapter, so views only ever see
//! well-formed data.

use serde::{Deserialize, Serialize};

use shopease_core::{Cart, Product, ProductId, Wishlist};

/// Semantic checks applied after a body has been decoded.
pub trait Validate {
    /// Returns a description of the first violation found.
    ///
    /// # Errors
    ///
    /// Returns the violation as a human-readable string.
    fn validate(&self) -> Result<(), String>;
}

fn validate_product(product: &Product) -> Result<(), String> {
    if product.id.is_blank() {
        return Err("product has an empty _id".to_string());
    }
    if product.price.is_negative() {
        return Err(format!("product {} has a negative price", product.id));
    }
    Ok(())
}

fn validate_ids<'a>(ids: impl IntoIterator<Item = &'a ProductId>) -> Result<(), String> {
    if ids.into_iter().any(ProductId::is_blank) {
        return Err("wishlist contains an empty product id".to_string());
    }
    Ok(())
}

/// Error body: `{ "message": "..." }`, message optional.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET product/get`
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

impl Validate for ProductsResponse {
    fn validate(&self) -> Result<(), String> {
        self.products.iter().try_for_each(validate_product)
    }
}

/// `GET product/get/:id`
#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    pub product: Product,
}

impl Validate for ProductResponse {
    fn validate(&self) -> Result<(), String> {
        validate_product(&self.product)
    }
}

/// `GET user/wishlist`
#[derive(Debug, Deserialize)]
pub struct WishlistResponse {
    pub wishlist: Wishlist,
}

impl Validate for WishlistResponse {
    fn validate(&self) -> Result<(), String> {
        validate_ids(self.wishlist.iter())
    }
}

/// `POST user/add-to-wishlist`
#[derive(Debug, Deserialize)]
pub struct WishlistToggleResponse {
    pub wishlist: Wishlist,
    #[serde(default)]
    pub message: String,
}

impl Validate for WishlistToggleResponse {
    fn validate(&self) -> Result<(), String> {
        validate_ids(self.wishlist.iter())
    }
}

/// `POST user/login`, `POST user/register`, `POST user/logout`
#[derive(Debug, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

impl Validate for MessageResponse {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// `GET cart/get`, `POST cart/add`
#[derive(Debug, Deserialize)]
pub struct CartResponse {
    pub cart: Cart,
    #[serde(default)]
    pub message: Option<String>,
}

impl Validate for CartResponse {
    fn validate(&self) -> Result<(), String> {
        if self.cart.items.iter().any(|item| item.product.id().is_blank()) {
            return Err("cart line refers to an empty product id".to_string());
        }
        Ok(())
    }
}

/// Body of `POST user/add-to-wishlist`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistToggleRequest<'a> {
    pub product_id: &'a ProductId,
}

/// Body of `POST cart/add`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest<'a> {
    pub product_id: &'a ProductId,
    pub quantity: u32,
}

/// Body of `POST user/login`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST user/register`.
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub phone: &'a str,
}
