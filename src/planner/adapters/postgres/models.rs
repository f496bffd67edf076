//! Diesel row models for client history.

use super::schema::{clients, content_library, content_performance, reference_library};
use diesel::prelude::*;

/// Query result row for client profiles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClientRow {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub identity_guide: Option<String>,
}

/// Query result row for content-library entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = content_library)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LibraryRow {
    pub title: String,
    pub format: Option<String>,
}

/// Query result row for reference-library entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reference_library)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReferenceRow {
    pub title: String,
    pub source_url: Option<String>,
}

/// Query result row for performance records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = content_performance)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PerformanceRow {
    pub title: String,
    pub format: Option<String>,
    pub caption: Option<String>,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub saves: i64,
    pub reach: i64,
}
