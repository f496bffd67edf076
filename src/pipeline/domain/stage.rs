//! Pipeline stages: the ordered columns of a workspace board.

use super::{PipelineDomainError, StageId, TaskStatus, WorkspaceId};
use serde::{Deserialize, Serialize};

/// An ordered, named bucket tasks move through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStage {
    id: StageId,
    workspace_id: WorkspaceId,
    name: String,
    position: i32,
    column_type: String,
}

impl PipelineStage {
    /// Creates a validated stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::EmptyStageName`] for blank names and
    /// [`PipelineDomainError::NegativePosition`] for negative positions.
    pub fn new(
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        position: i32,
        column_type: impl Into<String>,
    ) -> Result<Self, PipelineDomainError> {
        Self::with_id(StageId::new(), workspace_id, name, position, column_type)
    }

    /// Creates a validated stage with a known identifier.
    ///
    /// # Errors
    ///
    /// Same as [`PipelineStage::new`].
    pub fn with_id(
        id: StageId,
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        position: i32,
        column_type: impl Into<String>,
    ) -> Result<Self, PipelineDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(PipelineDomainError::EmptyStageName);
        }
        if position < 0 {
            return Err(PipelineDomainError::NegativePosition(position));
        }
        Ok(Self {
            id,
            workspace_id,
            name: trimmed.to_owned(),
            position,
            column_type: column_type.into().trim().to_ascii_lowercase(),
        })
    }

    /// Returns the stage identifier.
    #[must_use]
    pub const fn id(&self) -> StageId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the board position.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Returns the raw column type tag.
    #[must_use]
    pub fn column_type(&self) -> &str {
        &self.column_type
    }

    /// Returns the status tasks carry while in this stage.
    #[must_use]
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_column_type(&self.column_type)
    }
}

/// Returns the stage with the lowest position.
///
/// Ties keep the earlier stage in `stages`.
#[must_use]
pub fn first_stage_by_position(stages: &[PipelineStage]) -> Option<&PipelineStage> {
    stages
        .iter()
        .reduce(|best, stage| if stage.position < best.position { stage } else { best })
}

/// Returns the lowest-positioned stage whose column type is exactly `status`.
///
/// Unlike [`PipelineStage::status`], custom column types never match here.
#[must_use]
pub fn stage_for_status(stages: &[PipelineStage], status: TaskStatus) -> Option<&PipelineStage> {
    stages
        .iter()
        .filter(|stage| TaskStatus::try_from(stage.column_type()) == Ok(status))
        .reduce(|best, stage| if stage.position < best.position { stage } else { best })
}
