//! The signed-in user's wishlist.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Server-owned set of product ids saved by the user.
///
/// The client never edits the set itself: each mutation response carries the
/// authoritative set, which replaces the local copy wholesale. Order is kept
/// as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist(Vec<ProductId>);

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Membership check by string comparison of identifiers.
    #[must_use]
    pub fn contains(&self, product_id: &str) -> bool {
        self.0.iter().any(|id| id.as_str() == product_id)
    }

    /// Replace the local copy with the server's set.
    pub fn replace(&mut self, ids: Vec<ProductId>) {
        self.0 = ids;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.0.iter()
    }
}

impl From<Vec<ProductId>> for Wishlist {
    fn from(ids: Vec<ProductId>) -> Self {
        Self(ids)
    }
}

impl FromIterator<ProductId> for Wishlist {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
