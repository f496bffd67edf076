//! Domain model for the content pipeline.
//!
//! Planning tasks move through workspace-scoped pipeline stages. A stage's
//! column type decides which status a task carries while it sits in that
//! stage, and a task's position orders it within the stage.

mod error;
mod ids;
mod stage;
mod status;
mod task;

pub use error::{ParseTaskStatusError, PipelineDomainError};
pub use ids::{ClientId, PlanningTaskId, StageId, UserId, WorkspaceId};
pub use stage::{PipelineStage, first_stage_by_position, stage_for_status};
pub use status::{TaskPriority, TaskStatus};
pub use task::{PersistedPlanningTaskData, PlanningTask, PlanningTaskDraft, TaskMetadata};
