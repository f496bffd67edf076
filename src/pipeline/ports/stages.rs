//! Repository port for pipeline stages.

use crate::pipeline::domain::{PipelineStage, StageId, WorkspaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for stage repository operations.
pub type PipelineStageResult<T> = Result<T, PipelineStageRepositoryError>;

/// Pipeline stage persistence contract.
#[async_trait]
pub trait PipelineStageRepository: Send + Sync {
    /// Stores a new stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineStageRepositoryError::DuplicateStage`] when the ID
    /// already exists.
    async fn store(&self, stage: &PipelineStage) -> PipelineStageResult<()>;

    /// Lists a workspace's stages ordered by position.
    async fn list_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> PipelineStageResult<Vec<PipelineStage>>;
}

/// Errors returned by stage repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PipelineStageRepositoryError {
    /// A stage with the same identifier already exists.
    #[error("duplicate stage identifier: {0}")]
    DuplicateStage(StageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PipelineStageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
