//! Shared cart store.
//!
//! The storefront context owns exactly one [`CartStore`]. It is the only
//! component that fetches the cart; the header badge, the cart page and the
//! product page all read through its accessors.
//!
//! # Ordering
//!
//! Each [`CartStore::sync`] takes a generation number when it is *issued*.
//! A response is applied only if no later-issued request has already been
//! applied, so overlapping syncs resolve last-write-wins by issue order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use shopease_core::{Cart, ProductId};

use crate::api::{ApiClient, CartUpdate};
use crate::error::ApiError;
use crate::scope::ViewScope;

/// Point-in-time copy of the cached cart.
#[derive(Debug, Clone, Default)]
pub struct CartSnapshot {
    pub cart: Cart,
    /// Generation of the request that produced `cart` (0 = never fetched).
    pub generation: u64,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CartSnapshot {
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.cart.item_count()
    }
}

/// Outcome of a [`CartStore::sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The response was applied.
    Applied,
    /// A newer response had already been applied; this one was dropped.
    Stale,
    /// The request failed; the cache was left as it was.
    Failed,
    /// The owning scope was torn down.
    Cancelled,
}

/// Cheaply cloneable handle to the shared cart cache.
#[derive(Debug, Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

#[derive(Debug)]
struct CartStoreInner {
    api: ApiClient,
    next_generation: AtomicU64,
    state: RwLock<CartSnapshot>,
}

impl CartStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                api,
                next_generation: AtomicU64::new(1),
                state: RwLock::new(CartSnapshot::default()),
            }),
        }
    }

    fn issue_generation(&self) -> u64 {
        self.inner.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    /// Apply `cart` if `generation` is newer than what is cached.
    async fn apply(&self, generation: u64, cart: Cart) -> bool {
        let mut state = self.inner.state.write().await;
        if generation <= state.generation {
            debug!(
                generation,
                cached = state.generation,
                "Discarding stale cart response"
            );
            return false;
        }
        *state = CartSnapshot {
            cart,
            generation,
            fetched_at: Some(Utc::now()),
        };
        true
    }

    /// Fetch the cart and cache it.
    ///
    /// Does not check authentication first: signed-out users get a failed
    /// fetch, which is logged and leaves the cache untouched.
    #[instrument(skip_all)]
    pub async fn sync(&self, scope: &ViewScope) -> SyncOutcome {
        let generation = self.issue_generation();
        match scope.run(self.inner.api.cart()).await {
            Ok(cart) => {
                if self.apply(generation, cart).await {
                    SyncOutcome::Applied
                } else {
                    SyncOutcome::Stale
                }
            }
            Err(ApiError::Cancelled) => SyncOutcome::Cancelled,
            Err(err) => {
                debug!(error = %err, "Cart sync failed");
                SyncOutcome::Failed
            }
        }
    }

    /// Add one unit of `product_id` and cache the returned cart.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged; the cache is not modified on failure.
    #[instrument(skip(self, scope), fields(product_id = %product_id))]
    pub async fn add_item(
        &self,
        scope: &ViewScope,
        product_id: &ProductId,
    ) -> Result<CartUpdate, ApiError> {
        let generation = self.issue_generation();
        let update = scope.run(self.inner.api.add_to_cart(product_id)).await?;
        self.apply(generation, update.cart.clone()).await;
        Ok(update)
    }

    /// Forget the cached cart (after logout).
    pub async fn clear(&self) {
        let generation = self.issue_generation();
        self.apply(generation, Cart::empty()).await;
    }

    /// Number of line items in the cached cart.
    pub async fn item_count(&self) -> usize {
        self.inner.state.read().await.item_count()
    }

    /// Header badge value: the item count, or `None` when the cart is empty.
    pub async fn badge(&self) -> Option<usize> {
        Some(self.item_count().await).filter(|count| *count > 0)
    }

    pub async fn snapshot(&self) -> CartSnapshot {
        self.inner.state.read().await.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use shopease_core::{CartItem, ProductRef};

    fn store() -> CartStore {
        let config = ClientConfig::with_base_url("http://127.0.0.1:9/api/v1/").unwrap();
        CartStore::new(ApiClient::new(&config).unwrap())
    }

    fn cart_with(n: usize) -> Cart {
        Cart {
            items: (0..n)
                .map(|i| CartItem {
                    id: None,
                    product: ProductRef::Id(ProductId::new(format!("p{i}"))),
                    quantity: 1,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_has_no_badge() {
        let store = store();
        assert_eq!(store.item_count().await, 0);
        assert_eq!(store.badge().await, None);
        assert!(store.snapshot().await.fetched_at.is_none());
    }

    #[tokio::test]
    async fn test_badge_equals_item_count() {
        let store = store();
        let generation = store.issue_generation();
        assert!(store.apply(generation, cart_with(3)).await);
        assert_eq!(store.item_count().await, 3);
        assert_eq!(store.badge().await, Some(3));
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let store = store();
        let older = store.issue_generation();
        let newer = store.issue_generation();

        assert!(store.apply(newer, cart_with(2)).await);
        assert!(!store.apply(older, cart_with(5)).await);

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.item_count(), 2);
        assert_eq!(snapshot.generation, newer);
    }

    #[tokio::test]
    async fn test_failed_sync_leaves_cache() {
        let store = store();
        let generation = store.issue_generation();
        store.apply(generation, cart_with(1)).await;

        let outcome = store.sync(&ViewScope::new()).await;
        assert_eq!(outcome, SyncOutcome::Failed);
        assert_eq!(store.item_count().await, 1);
    }

    #[tokio::test]
    async fn test_cancelled_sync() {
        let store = store();
        let scope = ViewScope::new();
        scope.teardown();
        assert_eq!(store.sync(&scope).await, SyncOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_clear_empties_cart() {
        let store = store();
        let generation = store.issue_generation();
        store.apply(generation, cart_with(4)).await;
        store.clear().await;
        assert_eq!(store.badge().await, None);
    }
}
