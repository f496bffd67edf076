//! `PostgreSQL` repositories for planning tasks and stages.

use super::{
    models::{NewPlanningTaskRow, NewStageRow, PlanningTaskRow, StageRow},
    schema::{pipeline_stages, planning_tasks},
};
use crate::pipeline::{
    domain::{
        ClientId, PersistedPlanningTaskData, PipelineStage, PlanningTask, PlanningTaskId,
        StageId, TaskMetadata, TaskPriority, TaskStatus, UserId, WorkspaceId,
    },
    ports::{
        PipelineStageRepository, PipelineStageRepositoryError, PipelineStageResult,
        PlanningTaskRepository, PlanningTaskRepositoryError, PlanningTaskRepositoryResult,
    },
};
use crate::postgres::{PgPool, run_blocking_with};
use async_trait::async_trait;
use diesel::dsl::max;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

const POSITION_CONSTRAINT: &str = "idx_planning_tasks_stage_position";

/// `PostgreSQL`-backed planning task repository.
#[derive(Debug, Clone)]
pub struct PostgresPlanningTaskRepository {
    pool: PgPool,
}

impl PostgresPlanningTaskRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> PlanningTaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PlanningTaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking_with(
            &self.pool,
            f,
            PlanningTaskRepositoryError::persistence,
            PlanningTaskRepositoryError::persistence,
        )
        .await
    }
}

type StageFilteredQuery<'a> = planning_tasks::BoxedQuery<'a, Pg>;

fn stage_scope<'a>(
    workspace_id: WorkspaceId,
    stage_id: Option<StageId>,
) -> StageFilteredQuery<'a> {
    let query = planning_tasks::table
        .filter(planning_tasks::workspace_id.eq(workspace_id.into_inner()))
        .into_boxed();
    match stage_id {
        Some(stage) => query.filter(planning_tasks::stage_id.eq(stage.into_inner())),
        None => query.filter(planning_tasks::stage_id.is_null()),
    }
}

#[async_trait]
impl PlanningTaskRepository for PostgresPlanningTaskRepository {
    async fn store(&self, task: &PlanningTask) -> PlanningTaskRepositoryResult<()> {
        let task_id = task.id();
        let stage_id = task.stage_id();
        let position = task.position();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(planning_tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some(POSITION_CONSTRAINT) =>
                    {
                        PlanningTaskRepositoryError::duplicate_position(stage_id, position)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        PlanningTaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => PlanningTaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: PlanningTaskId,
    ) -> PlanningTaskRepositoryResult<Option<PlanningTask>> {
        self.run_blocking(move |connection| {
            let row = planning_tasks::table
                .find(id.into_inner())
                .select(PlanningTaskRow::as_select())
                .first::<PlanningTaskRow>(connection)
                .optional()
                .map_err(PlanningTaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn max_position(
        &self,
        workspace_id: WorkspaceId,
        stage_id: Option<StageId>,
    ) -> PlanningTaskRepositoryResult<Option<i32>> {
        self.run_blocking(move |connection| {
            stage_scope(workspace_id, stage_id)
                .select(max(planning_tasks::position))
                .first::<Option<i32>>(connection)
                .map_err(PlanningTaskRepositoryError::persistence)
        })
        .await
    }
}

fn to_new_row(task: &PlanningTask) -> NewPlanningTaskRow {
    NewPlanningTaskRow {
        id: task.id().into_inner(),
        workspace_id: task.workspace_id().into_inner(),
        client_id: task.client_id().map(ClientId::into_inner),
        stage_id: task.stage_id().map(StageId::into_inner),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        content: task.content().map(str::to_owned),
        platform: task.platform().map(str::to_owned),
        content_type: task.content_type().map(str::to_owned),
        due_date: task.due_date(),
        scheduled_at: task.scheduled_at(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        position: task.position(),
        labels: task.labels().to_vec(),
        assignee_id: task.assignee_id().map(UserId::into_inner),
        media: task.media().to_vec(),
        metadata: Value::Object(task.metadata().clone()),
        created_by: task.created_by().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: PlanningTaskRow) -> PlanningTaskRepositoryResult<PlanningTask> {
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(PlanningTaskRepositoryError::persistence)?;
    let metadata = match row.metadata {
        Value::Object(map) => map,
        Value::Null => TaskMetadata::new(),
        other => {
            let mut wrapped = TaskMetadata::new();
            wrapped.insert("value".to_owned(), other);
            wrapped
        }
    };

    Ok(PlanningTask::from_persisted(PersistedPlanningTaskData {
        id: PlanningTaskId::from_uuid(row.id),
        workspace_id: WorkspaceId::from_uuid(row.workspace_id),
        client_id: row.client_id.map(ClientId::from_uuid),
        stage_id: row.stage_id.map(StageId::from_uuid),
        title: row.title,
        description: row.description,
        content: row.content,
        platform: row.platform,
        content_type: row.content_type,
        due_date: row.due_date,
        scheduled_at: row.scheduled_at,
        status,
        priority: TaskPriority::from_stored(&row.priority),
        position: row.position,
        labels: row.labels,
        assignee_id: row.assignee_id.map(UserId::from_uuid),
        media: row.media,
        metadata,
        created_by: row.created_by.map(UserId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

/// `PostgreSQL`-backed stage repository.
#[derive(Debug, Clone)]
pub struct PostgresPipelineStageRepository {
    pool: PgPool,
}

impl PostgresPipelineStageRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PipelineStageRepository for PostgresPipelineStageRepository {
    async fn store(&self, stage: &PipelineStage) -> PipelineStageResult<()> {
        let stage_id = stage.id();
        let row = NewStageRow {
            id: stage.id().into_inner(),
            workspace_id: stage.workspace_id().into_inner(),
            name: stage.name().to_owned(),
            position: stage.position(),
            column_type: stage.column_type().to_owned(),
            created_at: chrono::Utc::now(),
        };

        run_blocking_with(
            &self.pool,
            move |connection| {
                diesel::insert_into(pipeline_stages::table)
                    .values(&row)
                    .execute(connection)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            PipelineStageRepositoryError::DuplicateStage(stage_id)
                        }
                        _ => PipelineStageRepositoryError::persistence(err),
                    })?;
                Ok(())
            },
            PipelineStageRepositoryError::persistence,
            PipelineStageRepositoryError::persistence,
        )
        .await
    }

    async fn list_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> PipelineStageResult<Vec<PipelineStage>> {
        run_blocking_with(
            &self.pool,
            move |connection| {
                let rows = pipeline_stages::table
                    .filter(pipeline_stages::workspace_id.eq(workspace_id.into_inner()))
                    .order((pipeline_stages::position.asc(), pipeline_stages::created_at.asc()))
                    .select(StageRow::as_select())
                    .load::<StageRow>(connection)
                    .map_err(PipelineStageRepositoryError::persistence)?;
                rows.into_iter()
                    .map(|row| {
                        PipelineStage::with_id(
                            StageId::from_uuid(row.id),
                            WorkspaceId::from_uuid(row.workspace_id),
                            row.name,
                            row.position,
                            row.column_type,
                        )
                        .map_err(PipelineStageRepositoryError::persistence)
                    })
                    .collect()
            },
            PipelineStageRepositoryError::persistence,
            PipelineStageRepositoryError::persistence,
        )
        .await
    }
}
