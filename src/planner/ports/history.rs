//! Read-only port over a client's profile and content history.

use crate::pipeline::domain::ClientId;
use crate::planner::domain::{
    ClientProfile, ContentLibraryEntry, PerformanceRecord, ReferenceEntry,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for client history lookups.
pub type ClientHistoryResult<T> = Result<T, ClientHistoryError>;

/// Client profile and history lookups.
#[async_trait]
pub trait ClientHistoryRepository: Send + Sync {
    /// Finds a client's profile.
    async fn find_profile(&self, client_id: ClientId) -> ClientHistoryResult<Option<ClientProfile>>;

    /// Lists the client's `limit` best performance records.
    ///
    /// Records are ordered by [`EngagementMetrics::score`] descending; ties
    /// keep insertion order.
    ///
    /// [`EngagementMetrics::score`]: crate::planner::domain::EngagementMetrics::score
    async fn top_performance_records(
        &self,
        client_id: ClientId,
        limit: usize,
    ) -> ClientHistoryResult<Vec<PerformanceRecord>>;

    /// Lists up to `limit` content-library entries, newest first.
    async fn library_entries(
        &self,
        client_id: ClientId,
        limit: usize,
    ) -> ClientHistoryResult<Vec<ContentLibraryEntry>>;

    /// Lists up to `limit` reference-library entries, newest first.
    async fn reference_entries(
        &self,
        client_id: ClientId,
        limit: usize,
    ) -> ClientHistoryResult<Vec<ReferenceEntry>>;
}

/// Errors returned by client history implementations.
#[derive(Debug, Clone, Error)]
pub enum ClientHistoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ClientHistoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
