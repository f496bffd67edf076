//! `PostgreSQL` repository for client profiles and history.

use super::{
    models::{ClientRow, LibraryRow, PerformanceRow, ReferenceRow},
    schema::{clients, content_library, content_performance, reference_library},
};
use crate::pipeline::domain::ClientId;
use crate::planner::{
    domain::{
        ClientProfile, ContentLibraryEntry, EngagementMetrics, PerformanceRecord, ReferenceEntry,
    },
    ports::{ClientHistoryError, ClientHistoryRepository, ClientHistoryResult},
};
use crate::postgres::{PgPool, run_blocking_with};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed client history.
#[derive(Debug, Clone)]
pub struct PostgresClientHistoryRepository {
    pool: PgPool,
}

impl PostgresClientHistoryRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ClientHistoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ClientHistoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking_with(
            &self.pool,
            f,
            ClientHistoryError::persistence,
            ClientHistoryError::persistence,
        )
        .await
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn counter(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl ClientHistoryRepository for PostgresClientHistoryRepository {
    async fn find_profile(&self, client_id: ClientId) -> ClientHistoryResult<Option<ClientProfile>> {
        self.run_blocking(move |connection| {
            let row = clients::table
                .find(client_id.into_inner())
                .select(ClientRow::as_select())
                .first::<ClientRow>(connection)
                .optional()
                .map_err(ClientHistoryError::persistence)?;
            Ok(row.map(|client| ClientProfile {
                id: ClientId::from_uuid(client.id),
                name: client.name,
                description: client.description,
                identity_guide: client.identity_guide,
            }))
        })
        .await
    }

    async fn top_performance_records(
        &self,
        client_id: ClientId,
        limit: usize,
    ) -> ClientHistoryResult<Vec<PerformanceRecord>> {
        self.run_blocking(move |connection| {
            // Same sum as `EngagementMetrics::score`; reach is excluded.
            let score = content_performance::likes
                + content_performance::comments
                + content_performance::shares
                + content_performance::saves;
            let rows = content_performance::table
                .filter(content_performance::client_id.eq(client_id.into_inner()))
                .order((
                    score.desc(),
                    content_performance::created_at.asc(),
                    content_performance::id.asc(),
                ))
                .limit(sql_limit(limit))
                .select(PerformanceRow::as_select())
                .load::<PerformanceRow>(connection)
                .map_err(ClientHistoryError::persistence)?;
            Ok(rows
                .into_iter()
                .map(|row| PerformanceRecord {
                    title: row.title,
                    format: row.format,
                    caption: row.caption,
                    metrics: EngagementMetrics {
                        likes: counter(row.likes),
                        comments: counter(row.comments),
                        shares: counter(row.shares),
                        saves: counter(row.saves),
                        reach: counter(row.reach),
                    },
                })
                .collect())
        })
        .await
    }

    async fn library_entries(
        &self,
        client_id: ClientId,
        limit: usize,
    ) -> ClientHistoryResult<Vec<ContentLibraryEntry>> {
        self.run_blocking(move |connection| {
            let rows = content_library::table
                .filter(content_library::client_id.eq(client_id.into_inner()))
                .order(content_library::created_at.desc())
                .limit(sql_limit(limit))
                .select(LibraryRow::as_select())
                .load::<LibraryRow>(connection)
                .map_err(ClientHistoryError::persistence)?;
            Ok(rows
                .into_iter()
                .map(|row| ContentLibraryEntry {
                    title: row.title,
                    format: row.format,
                })
                .collect())
        })
        .await
    }

    async fn reference_entries(
        &self,
        client_id: ClientId,
        limit: usize,
    ) -> ClientHistoryResult<Vec<ReferenceEntry>> {
        self.run_blocking(move |connection| {
            let rows = reference_library::table
                .filter(reference_library::client_id.eq(client_id.into_inner()))
                .order(reference_library::created_at.desc())
                .limit(sql_limit(limit))
                .select(ReferenceRow::as_select())
                .load::<ReferenceRow>(connection)
                .map_err(ClientHistoryError::persistence)?;
            Ok(rows
                .into_iter()
                .map(|row| ReferenceEntry {
                    title: row.title,
                    source_url: row.source_url,
                })
                .collect())
        })
        .await
    }
}
