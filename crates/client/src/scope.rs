//! View lifecycle scopes.
//!
//! Each view owns a [`ViewScope`]. Requests the view issues go through
//! [`ViewScope::run`], which resolves to [`ApiError::Cancelled`] as soon as
//! the scope is torn down, so a view never applies a response after it was
//! closed. Scopes form a tree: tearing down a parent tears down every child.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

/// Cancellation handle tied to the lifetime of one view.
///
/// Clones share the same token; use [`ViewScope::child`] for nested views.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    /// Create a root scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope that is torn down together with `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Tear the view down, cancelling every in-flight request.
    pub fn teardown(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run a request future unless the scope is torn down first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Cancelled` if the scope was torn down before or
    /// while the future ran; otherwise the future's own result.
    pub async fn run<F, T>(&self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.is_torn_down() {
            return Err(ApiError::Cancelled);
        }
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ApiError::Cancelled),
            result = request => {
                // A response that raced the teardown is dropped as well.
                if self.is_torn_down() {
                    Err(ApiError::Cancelled)
                } else {
                    result
                }
            }
        }
    }

    /// Guard that tears the scope down when dropped.
    #[must_use]
    pub fn guard(&self) -> ScopeGuard {
        ScopeGuard {
            scope: self.clone(),
        }
    }
}

/// Tears its scope down on drop. Views hold one so that dropping the view
/// cancels its requests.
#[derive(Debug)]
pub struct ScopeGuard {
    scope: ViewScope,
}

impl ScopeGuard {
    #[must_use]
    pub const fn scope(&self) -> &ViewScope {
        &self.scope
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.scope.teardown();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let scope = ViewScope::new();
        let value = scope.run(async { Ok::<_, ApiError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_run_after_teardown_is_cancelled() {
        let scope = ViewScope::new();
        scope.teardown();
        let err = scope.run(async { Ok::<_, ApiError>(7) }).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_teardown_cancels_in_flight_request() {
        let scope = ViewScope::new();
        let remote = scope.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            remote.teardown();
        });

        let err = scope
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, ApiError>(())
            })
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_parent_teardown_reaches_children() {
        let parent = ViewScope::new();
        let child = parent.child();
        let grandchild = child.child();
        parent.teardown();
        assert!(child.is_torn_down());
        assert!(grandchild.is_torn_down());
    }

    #[test]
    fn test_child_teardown_leaves_parent() {
        let parent = ViewScope::new();
        let child = parent.child();
        child.teardown();
        assert!(!parent.is_torn_down());
    }

    #[test]
    fn test_guard_drop_tears_down() {
        let scope = ViewScope::new();
        {
            let _guard = scope.guard();
        }
        assert!(scope.is_torn_down());
    }
}
