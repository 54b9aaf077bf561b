//! Catalog product as returned by the commerce API.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A catalog product.
///
/// Owned and mutated only by the remote service; the client treats it as an
/// immutable snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Service-issued identifier (`_id` on the wire).
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    /// Image URL or path as provided by the service.
    #[serde(default)]
    pub image: String,
    /// Stock flag; a missing flag counts as out of stock.
    #[serde(default)]
    pub in_stock: bool,
}

impl Product {
    /// Whether the product should carry the "Out of stock" marker.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        !self.in_stock
    }
}
