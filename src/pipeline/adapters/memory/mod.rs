//! In-memory adapters for pipeline tests and local runs.

mod stage;
mod task;

pub use stage::InMemoryPipelineStageRepository;
pub use task::InMemoryPlanningTaskRepository;
