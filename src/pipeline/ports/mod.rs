//! Port contracts for pipeline persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the placement
//! service and both planning jobs.

pub mod repository;
pub mod stages;

pub use repository::{
    PlanningTaskRepository, PlanningTaskRepositoryError, PlanningTaskRepositoryResult,
};
pub use stages::{PipelineStageRepository, PipelineStageRepositoryError, PipelineStageResult};
