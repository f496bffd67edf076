//! Repository port for planning task persistence and position lookup.

use crate::pipeline::domain::{PlanningTask, PlanningTaskId, StageId, WorkspaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for planning task repository operations.
pub type PlanningTaskRepositoryResult<T> = Result<T, PlanningTaskRepositoryError>;

/// Planning task persistence contract.
#[async_trait]
pub trait PlanningTaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningTaskRepositoryError::DuplicateTask`] when the ID
    /// already exists or [`PlanningTaskRepositoryError::DuplicatePosition`]
    /// when another task already holds the position in the same stage.
    async fn store(&self, task: &PlanningTask) -> PlanningTaskRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(
        &self,
        id: PlanningTaskId,
    ) -> PlanningTaskRepositoryResult<Option<PlanningTask>>;

    /// Returns the highest position used in a stage, or `None` when empty.
    ///
    /// `stage_id = None` addresses the tasks that sit in no stage.
    async fn max_position(
        &self,
        workspace_id: WorkspaceId,
        stage_id: Option<StageId>,
    ) -> PlanningTaskRepositoryResult<Option<i32>>;
}

/// Errors returned by planning task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PlanningTaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(PlanningTaskId),

    /// Another task already occupies the position.
    #[error("position {position} is already taken in stage {stage}")]
    DuplicatePosition {
        /// Stage identifier, rendered as `none` for unstaged tasks.
        stage: String,
        /// Contested position.
        position: i32,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PlanningTaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a position conflict error.
    #[must_use]
    pub fn duplicate_position(stage_id: Option<StageId>, position: i32) -> Self {
        Self::DuplicatePosition {
            stage: stage_id.map_or_else(|| "none".to_owned(), |id| id.to_string()),
            position,
        }
    }
}
