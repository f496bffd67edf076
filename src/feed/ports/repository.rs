//! Repository port for feed subscriptions and their watermarks.

use crate::feed::domain::{FeedSubscription, SubscriptionId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for subscription repository operations.
pub type FeedSubscriptionResult<T> = Result<T, FeedSubscriptionRepositoryError>;

/// Subscription persistence contract.
#[async_trait]
pub trait FeedSubscriptionRepository: Send + Sync {
    /// Lists active subscriptions in a stable order.
    async fn list_active(&self) -> FeedSubscriptionResult<Vec<FeedSubscription>>;

    /// Stores a new subscription.
    ///
    /// # Errors
    ///
    /// Returns [`FeedSubscriptionRepositoryError::DuplicateSubscription`] when
    /// the identifier already exists.
    async fn store(&self, subscription: &FeedSubscription) -> FeedSubscriptionResult<()>;

    /// Finds a subscription by identifier.
    async fn find_by_id(
        &self,
        id: SubscriptionId,
    ) -> FeedSubscriptionResult<Option<FeedSubscription>>;

    /// Persists the watermark fields and seen-set of `subscription`.
    ///
    /// Implementations merge the seen-set with what is already stored, so a
    /// stale snapshot can never drop an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FeedSubscriptionRepositoryError::NotFound`] when the
    /// subscription no longer exists.
    async fn record_watermark(&self, subscription: &FeedSubscription)
    -> FeedSubscriptionResult<()>;
}

/// Errors returned by subscription repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FeedSubscriptionRepositoryError {
    /// A subscription with the same identifier already exists.
    #[error("duplicate subscription identifier: {0}")]
    DuplicateSubscription(SubscriptionId),

    /// The subscription was not found.
    #[error("subscription not found: {0}")]
    NotFound(SubscriptionId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FeedSubscriptionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
