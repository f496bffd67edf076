//! Diesel row models for pipeline persistence.

use super::schema::{pipeline_stages, planning_tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for stages.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pipeline_stages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StageRow {
    pub id: uuid::Uuid,
    pub workspace_id: uuid::Uuid,
    pub name: String,
    pub position: i32,
    pub column_type: String,
    pub created_at: DateTime<Utc>,
}

/// Insert model for stages.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pipeline_stages)]
pub struct NewStageRow {
    pub id: uuid::Uuid,
    pub workspace_id: uuid::Uuid,
    pub name: String,
    pub position: i32,
    pub column_type: String,
    pub created_at: DateTime<Utc>,
}

/// Query result row for planning tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = planning_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlanningTaskRow {
    pub id: uuid::Uuid,
    pub workspace_id: uuid::Uuid,
    pub client_id: Option<uuid::Uuid>,
    pub stage_id: Option<uuid::Uuid>,
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub platform: Option<String>,
    pub content_type: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: String,
    pub priority: String,
    pub position: i32,
    pub labels: Vec<String>,
    pub assignee_id: Option<uuid::Uuid>,
    pub media: Vec<String>,
    pub metadata: Value,
    pub created_by: Option<uuid::Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for planning tasks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = planning_tasks)]
pub struct NewPlanningTaskRow {
    pub id: uuid::Uuid,
    pub workspace_id: uuid::Uuid,
    pub client_id: Option<uuid::Uuid>,
    pub stage_id: Option<uuid::Uuid>,
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub platform: Option<String>,
    pub content_type: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: String,
    pub priority: String,
    pub position: i32,
    pub labels: Vec<String>,
    pub assignee_id: Option<uuid::Uuid>,
    pub media: Vec<String>,
    pub metadata: Value,
    pub created_by: Option<uuid::Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
