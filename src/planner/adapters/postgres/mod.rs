//! `PostgreSQL` adapter for client profiles and history.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresClientHistoryRepository;
