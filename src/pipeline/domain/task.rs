//! Planning task aggregate root.

use super::{
    ClientId, PipelineDomainError, PipelineStage, PlanningTaskId, StageId, TaskPriority,
    TaskStatus, UserId, WorkspaceId,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata attached to a task.
///
/// Machine-created tasks record their provenance here.
pub type TaskMetadata = Map<String, Value>;

/// Unplaced task content, before a stage position is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningTaskDraft {
    workspace_id: WorkspaceId,
    client_id: Option<ClientId>,
    stage_id: Option<StageId>,
    title: String,
    description: String,
    content: Option<String>,
    platform: Option<String>,
    content_type: Option<String>,
    due_date: Option<NaiveDate>,
    scheduled_at: Option<DateTime<Utc>>,
    status: TaskStatus,
    priority: TaskPriority,
    labels: Vec<String>,
    assignee_id: Option<UserId>,
    media: Vec<String>,
    metadata: TaskMetadata,
    created_by: Option<UserId>,
}

impl PlanningTaskDraft {
    /// Creates a draft with the required fields.
    #[must_use]
    pub fn new(workspace_id: WorkspaceId, title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            workspace_id,
            client_id: None,
            stage_id: None,
            title: title.into(),
            description: String::new(),
            content: None,
            platform: None,
            content_type: None,
            due_date: None,
            scheduled_at: None,
            status,
            priority: TaskPriority::default(),
            labels: Vec::new(),
            assignee_id: None,
            media: Vec::new(),
            metadata: TaskMetadata::new(),
            created_by: None,
        }
    }

    /// Sets the client the task is about.
    #[must_use]
    pub const fn with_client(mut self, client_id: Option<ClientId>) -> Self {
        self.client_id = client_id;
        self
    }

    /// Sets the target stage.
    #[must_use]
    pub const fn with_stage(mut self, stage_id: Option<StageId>) -> Self {
        self.stage_id = stage_id;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the content body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the platform tag.
    #[must_use]
    pub fn with_platform(mut self, platform: Option<String>) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the content-type tag.
    #[must_use]
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Sets the scheduled publication timestamp.
    #[must_use]
    pub const fn with_scheduled_at(mut self, scheduled_at: Option<DateTime<Utc>>) -> Self {
        self.scheduled_at = scheduled_at;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: Option<UserId>) -> Self {
        self.assignee_id = assignee_id;
        self
    }

    /// Sets media references.
    #[must_use]
    pub fn with_media(mut self, media: impl IntoIterator<Item = String>) -> Self {
        self.media = media.into_iter().collect();
        self
    }

    /// Sets the metadata map.
    #[must_use]
    pub fn with_metadata(mut self, metadata: TaskMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the creator.
    #[must_use]
    pub const fn with_creator(mut self, created_by: Option<UserId>) -> Self {
        self.created_by = created_by;
        self
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the target stage.
    #[must_use]
    pub const fn stage_id(&self) -> Option<StageId> {
        self.stage_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Planning task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningTask {
    id: PlanningTaskId,
    workspace_id: WorkspaceId,
    client_id: Option<ClientId>,
    stage_id: Option<StageId>,
    title: String,
    description: String,
    content: Option<String>,
    platform: Option<String>,
    content_type: Option<String>,
    due_date: Option<NaiveDate>,
    scheduled_at: Option<DateTime<Utc>>,
    status: TaskStatus,
    priority: TaskPriority,
    position: i32,
    labels: Vec<String>,
    assignee_id: Option<UserId>,
    media: Vec<String>,
    metadata: TaskMetadata,
    created_by: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPlanningTaskData {
    /// Persisted task identifier.
    pub id: PlanningTaskId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Client the task is about, if any.
    pub client_id: Option<ClientId>,
    /// Stage holding the task, if any.
    pub stage_id: Option<StageId>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Content body.
    pub content: Option<String>,
    /// Platform tag.
    pub platform: Option<String>,
    /// Content-type tag.
    pub content_type: Option<String>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Scheduled publication timestamp.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Position within the stage.
    pub position: i32,
    /// Labels.
    pub labels: Vec<String>,
    /// Assignee.
    pub assignee_id: Option<UserId>,
    /// Media references.
    pub media: Vec<String>,
    /// Metadata map.
    pub metadata: TaskMetadata,
    /// Creator.
    pub created_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PlanningTask {
    /// Places a draft at `position` and stamps creation time.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::EmptyTitle`] for blank titles and
    /// [`PipelineDomainError::NegativePosition`] for negative positions.
    pub fn from_draft(
        draft: PlanningTaskDraft,
        position: i32,
        clock: &impl Clock,
    ) -> Result<Self, PipelineDomainError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(PipelineDomainError::EmptyTitle);
        }
        if position < 0 {
            return Err(PipelineDomainError::NegativePosition(position));
        }
        let timestamp = clock.utc();

        Ok(Self {
            id: PlanningTaskId::new(),
            workspace_id: draft.workspace_id,
            client_id: draft.client_id,
            stage_id: draft.stage_id,
            title: title.to_owned(),
            description: draft.description,
            content: draft.content,
            platform: draft.platform,
            content_type: draft.content_type,
            due_date: draft.due_date,
            scheduled_at: draft.scheduled_at,
            status: draft.status,
            priority: draft.priority,
            position,
            labels: draft.labels,
            assignee_id: draft.assignee_id,
            media: draft.media,
            metadata: draft.metadata,
            created_by: draft.created_by,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPlanningTaskData) -> Self {
        Self {
            id: data.id,
            workspace_id: data.workspace_id,
            client_id: data.client_id,
            stage_id: data.stage_id,
            title: data.title,
            description: data.description,
            content: data.content,
            platform: data.platform,
            content_type: data.content_type,
            due_date: data.due_date,
            scheduled_at: data.scheduled_at,
            status: data.status,
            priority: data.priority,
            position: data.position,
            labels: data.labels,
            assignee_id: data.assignee_id,
            media: data.media,
            metadata: data.metadata,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> PlanningTaskId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the client, if any.
    #[must_use]
    pub const fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    /// Returns the stage, if any.
    #[must_use]
    pub const fn stage_id(&self) -> Option<StageId> {
        self.stage_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the content body, if generated.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the platform tag.
    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Returns the content-type tag.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the scheduled publication timestamp.
    #[must_use]
    pub const fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.scheduled_at
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the position within the stage.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Returns the labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns media references.
    #[must_use]
    pub fn media(&self) -> &[String] {
        &self.media
    }

    /// Returns the metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &TaskMetadata {
        &self.metadata
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Transitions the task to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::InvalidStatusTransition`] when the
    /// state machine forbids the move.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), PipelineDomainError> {
        if self.status == target {
            return Ok(());
        }
        if !self.status.can_transition_to(target) {
            return Err(PipelineDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Moves the task into `stage` at `position`, adopting the stage status.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::ForeignStage`] when the stage belongs to
    /// another workspace, [`PipelineDomainError::NegativePosition`] for
    /// negative positions, or a transition error when the stage status is
    /// unreachable from the current status.
    pub fn move_to_stage(
        &mut self,
        stage: &PipelineStage,
        position: i32,
        clock: &impl Clock,
    ) -> Result<(), PipelineDomainError> {
        if stage.workspace_id() != self.workspace_id {
            return Err(PipelineDomainError::ForeignStage(self.id));
        }
        if position < 0 {
            return Err(PipelineDomainError::NegativePosition(position));
        }
        self.transition_to(stage.status(), clock)?;
        self.stage_id = Some(stage.id());
        self.position = position;
        self.touch(clock);
        Ok(())
    }

    /// Stores generated content on the task.
    pub fn populate_content(&mut self, content: impl Into<String>, clock: &impl Clock) {
        self.content = Some(content.into());
        self.touch(clock);
    }

    /// Marks the task as failed and records the reason in metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::InvalidStatusTransition`] when the task
    /// is already published.
    pub fn mark_failed(
        &mut self,
        reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), PipelineDomainError> {
        self.transition_to(TaskStatus::Failed, clock)?;
        self.metadata
            .insert("failure_reason".to_owned(), Value::String(reason.into()));
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
