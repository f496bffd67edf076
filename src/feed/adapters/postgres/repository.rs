//! `PostgreSQL` repository for feed subscriptions.

use super::{
    models::{NewSubscriptionRow, SubscriptionRow, WatermarkChangeset},
    schema::feed_subscriptions,
};
use crate::feed::{
    domain::{FeedSubscription, PersistedFeedSubscriptionData, SubscriptionId},
    ports::{FeedSubscriptionRepository, FeedSubscriptionRepositoryError, FeedSubscriptionResult},
};
use crate::pipeline::domain::{ClientId, StageId, WorkspaceId};
use crate::postgres::{PgPool, run_blocking_with};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

/// `PostgreSQL`-backed subscription repository.
#[derive(Debug, Clone)]
pub struct PostgresFeedSubscriptionRepository {
    pool: PgPool,
}

impl PostgresFeedSubscriptionRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> FeedSubscriptionResult<T>
    where
        F: FnOnce(&mut PgConnection) -> FeedSubscriptionResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking_with(
            &self.pool,
            f,
            FeedSubscriptionRepositoryError::persistence,
            FeedSubscriptionRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl FeedSubscriptionRepository for PostgresFeedSubscriptionRepository {
    async fn list_active(&self) -> FeedSubscriptionResult<Vec<FeedSubscription>> {
        self.run_blocking(|connection| {
            let rows = feed_subscriptions::table
                .filter(feed_subscriptions::is_active.eq(true))
                .order((feed_subscriptions::created_at.asc(), feed_subscriptions::id.asc()))
                .select(SubscriptionRow::as_select())
                .load::<SubscriptionRow>(connection)
                .map_err(FeedSubscriptionRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_subscription).collect())
        })
        .await
    }

    async fn store(&self, subscription: &FeedSubscription) -> FeedSubscriptionResult<()> {
        let subscription_id = subscription.id();
        let row = to_new_row(subscription);
        self.run_blocking(move |connection| {
            diesel::insert_into(feed_subscriptions::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        FeedSubscriptionRepositoryError::DuplicateSubscription(subscription_id)
                    }
                    _ => FeedSubscriptionRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: SubscriptionId,
    ) -> FeedSubscriptionResult<Option<FeedSubscription>> {
        self.run_blocking(move |connection| {
            let row = feed_subscriptions::table
                .find(id.into_inner())
                .select(SubscriptionRow::as_select())
                .first::<SubscriptionRow>(connection)
                .optional()
                .map_err(FeedSubscriptionRepositoryError::persistence)?;
            Ok(row.map(row_to_subscription))
        })
        .await
    }

    async fn record_watermark(
        &self,
        subscription: &FeedSubscription,
    ) -> FeedSubscriptionResult<()> {
        let incoming = subscription.clone();
        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                let row = feed_subscriptions::table
                    .find(incoming.id().into_inner())
                    .select(SubscriptionRow::as_select())
                    .for_update()
                    .first::<SubscriptionRow>(tx)
                    .optional()
                    .map_err(FeedSubscriptionRepositoryError::persistence)?
                    .ok_or(FeedSubscriptionRepositoryError::NotFound(incoming.id()))?;

                let mut merged = row_to_subscription(row);
                merged.absorb_watermark(&incoming);
                let changeset = WatermarkChangeset {
                    last_checked_at: merged.last_checked_at(),
                    last_item_guid: merged.last_item_guid().map(str::to_owned),
                    items_seen: seen_to_json(&merged),
                };
                diesel::update(feed_subscriptions::table.find(incoming.id().into_inner()))
                    .set(&changeset)
                    .execute(tx)
                    .map_err(FeedSubscriptionRepositoryError::persistence)?;
                Ok(())
            })
        })
        .await
    }
}

impl From<DieselError> for FeedSubscriptionRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

fn seen_to_json(subscription: &FeedSubscription) -> Value {
    Value::Array(
        subscription
            .items_seen()
            .iter()
            .map(|guid| Value::String(guid.to_owned()))
            .collect(),
    )
}

fn seen_from_json(value: Value) -> Vec<String> {
    match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(guid) => Some(guid),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn to_new_row(subscription: &FeedSubscription) -> NewSubscriptionRow {
    NewSubscriptionRow {
        id: subscription.id().into_inner(),
        workspace_id: subscription.workspace_id().into_inner(),
        client_id: subscription.client_id().map(ClientId::into_inner),
        name: subscription.name().to_owned(),
        feed_url: subscription.feed_url().to_owned(),
        is_active: subscription.is_active(),
        stage_id: subscription.stage_id().map(StageId::into_inner),
        platform: subscription.platform().map(str::to_owned),
        content_type: subscription.content_type().map(str::to_owned),
        prompt_template: subscription
            .prompt_template()
            .map(|template| template.as_str().to_owned()),
        auto_generate_content: subscription.auto_generate_content(),
        last_checked_at: subscription.last_checked_at(),
        last_item_guid: subscription.last_item_guid().map(str::to_owned),
        items_seen: seen_to_json(subscription),
        created_at: chrono::Utc::now(),
    }
}

fn row_to_subscription(row: SubscriptionRow) -> FeedSubscription {
    FeedSubscription::from_persisted(PersistedFeedSubscriptionData {
        id: SubscriptionId::from_uuid(row.id),
        workspace_id: WorkspaceId::from_uuid(row.workspace_id),
        client_id: row.client_id.map(ClientId::from_uuid),
        name: row.name,
        feed_url: row.feed_url,
        is_active: row.is_active,
        stage_id: row.stage_id.map(StageId::from_uuid),
        platform: row.platform,
        content_type: row.content_type,
        prompt_template: row.prompt_template,
        auto_generate_content: row.auto_generate_content,
        last_checked_at: row.last_checked_at,
        last_item_guid: row.last_item_guid,
        items_seen: seen_from_json(row.items_seen),
    })
}
