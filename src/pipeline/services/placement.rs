//! Stage resolution and gap-free position allocation for new tasks.

use crate::pipeline::{
    domain::{
        PipelineDomainError, PipelineStage, PlanningTask, PlanningTaskDraft, StageId,
        WorkspaceId,
    },
    ports::{
        PipelineStageRepository, PipelineStageRepositoryError, PlanningTaskRepository,
        PlanningTaskRepositoryError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Attempts made per task when concurrent writers contest a position.
const MAX_POSITION_ATTEMPTS: usize = 3;

/// Service-level errors for task placement.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] PipelineDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] PlanningTaskRepositoryError),
    /// Stage repository operation failed.
    #[error(transparent)]
    Stages(#[from] PipelineStageRepositoryError),
}

/// Result type for placement operations.
pub type PlacementResult<T> = Result<T, PlacementError>;

/// Tracks the next free position while a batch is appended to one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCursor {
    workspace_id: WorkspaceId,
    stage_id: Option<StageId>,
    next_position: i32,
}

impl StageCursor {
    /// Returns the stage the cursor appends to.
    #[must_use]
    pub const fn stage_id(&self) -> Option<StageId> {
        self.stage_id
    }

    /// Returns the position the next successful insert receives.
    #[must_use]
    pub const fn next_position(&self) -> i32 {
        self.next_position
    }
}

/// Appends tasks to the end of pipeline stages.
///
/// Positions are read once per batch (`max + 1`) and advanced only on
/// successful inserts, so a failed insert never leaves a gap. When another
/// writer takes the position first, the repository reports a conflict and
/// the cursor re-reads the maximum before retrying.
#[derive(Clone)]
pub struct TaskPlacement<T, S, C>
where
    T: PlanningTaskRepository,
    S: PipelineStageRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    stages: Arc<S>,
    clock: Arc<C>,
}

impl<T, S, C> TaskPlacement<T, S, C>
where
    T: PlanningTaskRepository,
    S: PipelineStageRepository,
    C: Clock + Send + Sync,
{
    /// Creates a placement service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, stages: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            stages,
            clock,
        }
    }

    /// Lists a workspace's stages ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::Stages`] when the lookup fails.
    pub async fn stages(&self, workspace_id: WorkspaceId) -> PlacementResult<Vec<PipelineStage>> {
        Ok(self.stages.list_for_workspace(workspace_id).await?)
    }

    /// Opens a cursor positioned after the last task of a stage.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::Tasks`] when the position lookup fails.
    pub async fn open_cursor(
        &self,
        workspace_id: WorkspaceId,
        stage_id: Option<StageId>,
    ) -> PlacementResult<StageCursor> {
        let next_position = self.next_free_position(workspace_id, stage_id).await?;
        Ok(StageCursor {
            workspace_id,
            stage_id,
            next_position,
        })
    }

    /// Stores `draft` at the cursor's next position in the cursor's stage.
    ///
    /// # Errors
    ///
    /// Returns domain errors for invalid drafts and repository errors for
    /// failed inserts. Position conflicts are retried before surfacing.
    pub async fn place(
        &self,
        cursor: &mut StageCursor,
        draft: PlanningTaskDraft,
    ) -> PlacementResult<PlanningTask> {
        let staged = draft.with_stage(cursor.stage_id);
        let mut attempt = 1;
        loop {
            let task =
                PlanningTask::from_draft(staged.clone(), cursor.next_position, &*self.clock)?;
            match self.tasks.store(&task).await {
                Ok(()) => {
                    cursor.next_position = cursor.next_position.saturating_add(1);
                    debug!(
                        task_id = %task.id(),
                        position = task.position(),
                        "placed planning task"
                    );
                    return Ok(task);
                }
                Err(PlanningTaskRepositoryError::DuplicatePosition { position, .. })
                    if attempt < MAX_POSITION_ATTEMPTS =>
                {
                    warn!(
                        workspace_id = %cursor.workspace_id,
                        position,
                        attempt,
                        "position taken by a concurrent writer, refreshing"
                    );
                    cursor.next_position = self
                        .next_free_position(cursor.workspace_id, cursor.stage_id)
                        .await?;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn next_free_position(
        &self,
        workspace_id: WorkspaceId,
        stage_id: Option<StageId>,
    ) -> PlacementResult<i32> {
        let current = self.tasks.max_position(workspace_id, stage_id).await?;
        Ok(current.map_or(0, |max| max.saturating_add(1)))
    }
}
