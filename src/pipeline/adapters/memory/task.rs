//! In-memory repository for planning tasks.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::pipeline::{
    domain::{PlanningTask, PlanningTaskId, StageId, WorkspaceId},
    ports::{PlanningTaskRepository, PlanningTaskRepositoryError, PlanningTaskRepositoryResult},
};

type PositionKey = (WorkspaceId, Option<StageId>, i32);

/// Thread-safe in-memory planning task repository.
///
/// Insertion order is preserved so listings are deterministic, and the
/// `(workspace, stage, position)` uniqueness rule is enforced the way the
/// `PostgreSQL` unique index enforces it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanningTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<PlanningTaskId, PlanningTask>,
    insertion_order: Vec<PlanningTaskId>,
    positions: HashSet<PositionKey>,
    rejected_titles: HashSet<String>,
}

impl InMemoryPlanningTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `store` of a task with this title fail.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn reject_title(&self, title: impl Into<String>) -> PlanningTaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.rejected_titles.insert(title.into());
        Ok(())
    }

    /// Returns every stored task in insertion order.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn all(&self) -> PlanningTaskRepositoryResult<Vec<PlanningTask>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .insertion_order
            .iter()
            .filter_map(|id| state.tasks.get(id).cloned())
            .collect())
    }
}

fn lock_error(err: impl ToString) -> PlanningTaskRepositoryError {
    PlanningTaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

const fn position_key(task: &PlanningTask) -> PositionKey {
    (task.workspace_id(), task.stage_id(), task.position())
}

#[async_trait]
impl PlanningTaskRepository for InMemoryPlanningTaskRepository {
    async fn store(&self, task: &PlanningTask) -> PlanningTaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.rejected_titles.contains(task.title()) {
            return Err(PlanningTaskRepositoryError::persistence(
                std::io::Error::other(format!("insert rejected for '{}'", task.title())),
            ));
        }
        if state.tasks.contains_key(&task.id()) {
            return Err(PlanningTaskRepositoryError::DuplicateTask(task.id()));
        }
        let key = position_key(task);
        if state.positions.contains(&key) {
            return Err(PlanningTaskRepositoryError::duplicate_position(
                task.stage_id(),
                task.position(),
            ));
        }

        state.positions.insert(key);
        state.insertion_order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: PlanningTaskId,
    ) -> PlanningTaskRepositoryResult<Option<PlanningTask>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn max_position(
        &self,
        workspace_id: WorkspaceId,
        stage_id: Option<StageId>,
    ) -> PlanningTaskRepositoryResult<Option<i32>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .positions
            .iter()
            .filter(|(workspace, stage, _)| *workspace == workspace_id && *stage == stage_id)
            .map(|(_, _, position)| *position)
            .max())
    }
}
