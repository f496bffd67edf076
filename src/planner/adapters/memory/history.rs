//! In-memory client profiles and history.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::pipeline::domain::ClientId;
use crate::planner::{
    domain::{ClientProfile, ContentLibraryEntry, PerformanceRecord, ReferenceEntry},
    ports::{ClientHistoryError, ClientHistoryRepository, ClientHistoryResult},
};

/// Thread-safe in-memory client history.
///
/// Library and reference entries are returned newest first, mirroring the
/// `PostgreSQL` adapter's ordering.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientHistory {
    state: Arc<RwLock<HistoryState>>,
}

#[derive(Debug, Default)]
struct HistoryState {
    profiles: HashMap<ClientId, ClientProfile>,
    performance: HashMap<ClientId, Vec<PerformanceRecord>>,
    library: HashMap<ClientId, Vec<ContentLibraryEntry>>,
    references: HashMap<ClientId, Vec<ReferenceEntry>>,
}

impl InMemoryClientHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a client profile.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn add_profile(&self, profile: ClientProfile) -> ClientHistoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.profiles.insert(profile.id, profile);
        Ok(())
    }

    /// Appends a performance record.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn add_performance(
        &self,
        client_id: ClientId,
        record: PerformanceRecord,
    ) -> ClientHistoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.performance.entry(client_id).or_default().push(record);
        Ok(())
    }

    /// Appends a content-library entry.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn add_library_entry(
        &self,
        client_id: ClientId,
        entry: ContentLibraryEntry,
    ) -> ClientHistoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.library.entry(client_id).or_default().push(entry);
        Ok(())
    }

    /// Appends a reference-library entry.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn add_reference(&self, client_id: ClientId, entry: ReferenceEntry) -> ClientHistoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.references.entry(client_id).or_default().push(entry);
        Ok(())
    }
}

fn lock_error(err: impl ToString) -> ClientHistoryError {
    ClientHistoryError::persistence(std::io::Error::other(err.to_string()))
}

fn newest_first<T: Clone>(entries: Option<&Vec<T>>, limit: usize) -> Vec<T> {
    entries
        .map(|all| all.iter().rev().take(limit).cloned().collect())
        .unwrap_or_default()
}

#[async_trait]
impl ClientHistoryRepository for InMemoryClientHistory {
    async fn find_profile(&self, client_id: ClientId) -> ClientHistoryResult<Option<ClientProfile>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.profiles.get(&client_id).cloned())
    }

    async fn top_performance_records(
        &self,
        client_id: ClientId,
        limit: usize,
    ) -> ClientHistoryResult<Vec<PerformanceRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut records = state
            .performance
            .get(&client_id)
            .cloned()
            .unwrap_or_default();
        records.sort_by_key(|record| Reverse(record.metrics.score()));
        records.truncate(limit);
        Ok(records)
    }

    async fn library_entries(
        &self,
        client_id: ClientId,
        limit: usize,
    ) -> ClientHistoryResult<Vec<ContentLibraryEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(newest_first(state.library.get(&client_id), limit))
    }

    async fn reference_entries(
        &self,
        client_id: ClientId,
        limit: usize,
    ) -> ClientHistoryResult<Vec<ReferenceEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(newest_first(state.references.get(&client_id), limit))
    }
}
