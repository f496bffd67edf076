//! `PostgreSQL` adapters for pipeline persistence.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::{PostgresPipelineStageRepository, PostgresPlanningTaskRepository};
