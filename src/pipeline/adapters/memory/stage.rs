//! In-memory repository for pipeline stages.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::pipeline::{
    domain::{PipelineStage, WorkspaceId},
    ports::{PipelineStageRepository, PipelineStageRepositoryError, PipelineStageResult},
};

/// Thread-safe in-memory stage repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPipelineStageRepository {
    stages: Arc<RwLock<Vec<PipelineStage>>>,
}

impl InMemoryPipelineStageRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> PipelineStageRepositoryError {
    PipelineStageRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl PipelineStageRepository for InMemoryPipelineStageRepository {
    async fn store(&self, stage: &PipelineStage) -> PipelineStageResult<()> {
        let mut stages = self.stages.write().map_err(lock_error)?;
        if stages.iter().any(|existing| existing.id() == stage.id()) {
            return Err(PipelineStageRepositoryError::DuplicateStage(stage.id()));
        }
        stages.push(stage.clone());
        Ok(())
    }

    async fn list_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> PipelineStageResult<Vec<PipelineStage>> {
        let stages = self.stages.read().map_err(lock_error)?;
        let mut listed: Vec<PipelineStage> = stages
            .iter()
            .filter(|stage| stage.workspace_id() == workspace_id)
            .cloned()
            .collect();
        listed.sort_by_key(PipelineStage::position);
        Ok(listed)
    }
}
