//! In-memory repository for feed subscriptions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::feed::{
    domain::{FeedSubscription, SubscriptionId},
    ports::{FeedSubscriptionRepository, FeedSubscriptionRepositoryError, FeedSubscriptionResult},
};

/// Thread-safe in-memory subscription repository.
///
/// Subscriptions are listed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedSubscriptionRepository {
    state: Arc<RwLock<InMemorySubscriptionState>>,
}

#[derive(Debug, Default)]
struct InMemorySubscriptionState {
    subscriptions: HashMap<SubscriptionId, FeedSubscription>,
    insertion_order: Vec<SubscriptionId>,
    fail_listing: bool,
}

impl InMemoryFeedSubscriptionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `list_active` call fail.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn fail_listing(&self) -> FeedSubscriptionResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.fail_listing = true;
        Ok(())
    }
}

fn lock_error(err: impl ToString) -> FeedSubscriptionRepositoryError {
    FeedSubscriptionRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl FeedSubscriptionRepository for InMemoryFeedSubscriptionRepository {
    async fn list_active(&self) -> FeedSubscriptionResult<Vec<FeedSubscription>> {
        let state = self.state.read().map_err(lock_error)?;
        if state.fail_listing {
            return Err(FeedSubscriptionRepositoryError::persistence(
                std::io::Error::other("subscription listing unavailable"),
            ));
        }
        Ok(state
            .insertion_order
            .iter()
            .filter_map(|id| state.subscriptions.get(id))
            .filter(|subscription| subscription.is_active())
            .cloned()
            .collect())
    }

    async fn store(&self, subscription: &FeedSubscription) -> FeedSubscriptionResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.subscriptions.contains_key(&subscription.id()) {
            return Err(FeedSubscriptionRepositoryError::DuplicateSubscription(
                subscription.id(),
            ));
        }
        state.insertion_order.push(subscription.id());
        state
            .subscriptions
            .insert(subscription.id(), subscription.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: SubscriptionId,
    ) -> FeedSubscriptionResult<Option<FeedSubscription>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.subscriptions.get(&id).cloned())
    }

    async fn record_watermark(
        &self,
        subscription: &FeedSubscription,
    ) -> FeedSubscriptionResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .subscriptions
            .get_mut(&subscription.id())
            .ok_or(FeedSubscriptionRepositoryError::NotFound(subscription.id()))?;
        stored.absorb_watermark(subscription);
        Ok(())
    }
}
