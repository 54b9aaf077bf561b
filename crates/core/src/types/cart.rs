//! Shopping cart snapshot.
//!
//! The cart is computed server-side. The client only needs the line items
//! to derive a count for the header badge, so line items are kept loose: the
//! product reference may arrive as a bare id or as a populated product.

use serde::{Deserialize, Serialize};

use super::id::{LineItemId, ProductId};
use super::product::Product;

/// A user's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of line items (not the summed quantity).
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any line item refers to the given product.
    #[must_use]
    pub fn contains_product(&self, product_id: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.product.id().as_str() == product_id)
    }
}

/// A cart line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LineItemId>,
    pub product: ProductRef,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Reference to the product on a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    /// The service sent only the product id.
    Id(ProductId),
    /// The service populated the full product document.
    Populated(Box<Product>),
}

impl ProductRef {
    /// The referenced product's id.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        match self {
            Self::Id(id) => id,
            Self::Populated(product) => &product.id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_product_refs() {
        let json = r#"{"items": [
            {"_id": "l1", "product": "p1", "quantity": 2},
            {"product": {"_id": "p2", "name": "Scarf", "price": 20}}
        ]}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.items[1].quantity, 1);
        assert!(cart.contains_product("p1"));
        assert!(cart.contains_product("p2"));
        assert!(!cart.contains_product("p3"));
    }

    #[test]
    fn test_missing_items_is_empty() {
        let cart: Cart = serde_json::from_str("{}").unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart, Cart::empty());
    }
}
