//! Diesel row models for feed subscriptions.

use super::schema::feed_subscriptions;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for subscriptions.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feed_subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubscriptionRow {
    pub id: uuid::Uuid,
    pub workspace_id: uuid::Uuid,
    pub client_id: Option<uuid::Uuid>,
    pub name: String,
    pub feed_url: String,
    pub is_active: bool,
    pub stage_id: Option<uuid::Uuid>,
    pub platform: Option<String>,
    pub content_type: Option<String>,
    pub prompt_template: Option<String>,
    pub auto_generate_content: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub last_item_guid: Option<String>,
    pub items_seen: Value,
}

/// Insert model for subscriptions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feed_subscriptions)]
pub struct NewSubscriptionRow {
    pub id: uuid::Uuid,
    pub workspace_id: uuid::Uuid,
    pub client_id: Option<uuid::Uuid>,
    pub name: String,
    pub feed_url: String,
    pub is_active: bool,
    pub stage_id: Option<uuid::Uuid>,
    pub platform: Option<String>,
    pub content_type: Option<String>,
    pub prompt_template: Option<String>,
    pub auto_generate_content: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub last_item_guid: Option<String>,
    pub items_seen: Value,
    pub created_at: DateTime<Utc>,
}

/// Update model for the watermark columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = feed_subscriptions)]
pub struct WatermarkChangeset {
    pub last_checked_at: Option<DateTime<Utc>>,
    pub last_item_guid: Option<String>,
    pub items_seen: Value,
}
