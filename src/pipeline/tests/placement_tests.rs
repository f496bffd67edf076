//! Placement service tests: stage cursors and position conflicts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::pipeline::{
    adapters::memory::{InMemoryPipelineStageRepository, InMemoryPlanningTaskRepository},
    domain::{
        PipelineStage, PlanningTask, PlanningTaskDraft, PlanningTaskId, StageId, TaskStatus,
        WorkspaceId,
    },
    ports::{PipelineStageRepository, PlanningTaskRepository, PlanningTaskRepositoryResult},
    services::TaskPlacement,
};
use crate::test_support::FixedClock;
use rstest::rstest;

fn draft(workspace: WorkspaceId, title: &str) -> PlanningTaskDraft {
    PlanningTaskDraft::new(workspace, title, TaskStatus::Idea)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cursor_appends_after_existing_tasks() {
    let workspace = WorkspaceId::new();
    let tasks = Arc::new(InMemoryPlanningTaskRepository::new());
    let stages = Arc::new(InMemoryPipelineStageRepository::new());
    let ideas = PipelineStage::new(workspace, "Ideas", 0, "idea").expect("valid stage");
    stages.store(&ideas).await.expect("stage stored");
    let placement = TaskPlacement::new(tasks, stages, Arc::new(FixedClock::at(2026, 1, 5)));

    let mut cursor = placement
        .open_cursor(workspace, Some(ideas.id()))
        .await
        .expect("cursor opens");
    assert_eq!(cursor.next_position(), 0);
    placement
        .place(&mut cursor, draft(workspace, "first"))
        .await
        .expect("first placed");

    let mut second_cursor = placement
        .open_cursor(workspace, Some(ideas.id()))
        .await
        .expect("cursor opens");
    let placed = placement
        .place(&mut second_cursor, draft(workspace, "second"))
        .await
        .expect("second placed");

    assert_eq!(placed.position(), 1);
    assert_eq!(placed.stage_id(), Some(ideas.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_insert_does_not_consume_a_position() {
    let workspace = WorkspaceId::new();
    let tasks = Arc::new(InMemoryPlanningTaskRepository::new());
    tasks.reject_title("broken").expect("hook installed");
    let placement = TaskPlacement::new(
        tasks,
        Arc::new(InMemoryPipelineStageRepository::new()),
        Arc::new(FixedClock::at(2026, 1, 5)),
    );

    let mut cursor = placement.open_cursor(workspace, None).await.expect("cursor");
    placement
        .place(&mut cursor, draft(workspace, "ok-1"))
        .await
        .expect("placed");
    assert!(
        placement
            .place(&mut cursor, draft(workspace, "broken"))
            .await
            .is_err()
    );
    let last = placement
        .place(&mut cursor, draft(workspace, "ok-2"))
        .await
        .expect("placed");

    assert_eq!(last.position(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn placed_task_is_readable_by_id() {
    let workspace = WorkspaceId::new();
    let tasks = Arc::new(InMemoryPlanningTaskRepository::new());
    let placement = TaskPlacement::new(
        Arc::clone(&tasks),
        Arc::new(InMemoryPipelineStageRepository::new()),
        Arc::new(FixedClock::at(2026, 1, 5)),
    );

    let mut cursor = placement.open_cursor(workspace, None).await.expect("cursor");
    let placed = placement
        .place(&mut cursor, draft(workspace, "stored"))
        .await
        .expect("placed");

    let found = tasks.find_by_id(placed.id()).await.expect("lookup");
    assert_eq!(found, Some(placed));
    let missing = tasks.find_by_id(PlanningTaskId::new()).await.expect("lookup");
    assert!(missing.is_none());
}

/// Task repository whose first `max_position` answer is stale, as if a
/// concurrent planner inserted between the read and the write.
struct RacingRepository {
    inner: InMemoryPlanningTaskRepository,
    stale_once: AtomicBool,
}

#[async_trait]
impl PlanningTaskRepository for RacingRepository {
    async fn store(&self, task: &PlanningTask) -> PlanningTaskRepositoryResult<()> {
        self.inner.store(task).await
    }

    async fn find_by_id(
        &self,
        id: PlanningTaskId,
    ) -> PlanningTaskRepositoryResult<Option<PlanningTask>> {
        self.inner.find_by_id(id).await
    }

    async fn max_position(
        &self,
        workspace_id: WorkspaceId,
        stage_id: Option<StageId>,
    ) -> PlanningTaskRepositoryResult<Option<i32>> {
        if self.stale_once.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.max_position(workspace_id, stage_id).await
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn position_conflict_refreshes_and_retries() {
    let workspace = WorkspaceId::new();
    let clock = FixedClock::at(2026, 1, 5);
    let inner = InMemoryPlanningTaskRepository::new();
    let existing = PlanningTask::from_draft(draft(workspace, "existing"), 0, &clock)
        .expect("valid task");
    inner.store(&existing).await.expect("seeded");
    let repository = Arc::new(RacingRepository {
        inner: inner.clone(),
        stale_once: AtomicBool::new(true),
    });
    let placement = TaskPlacement::new(
        repository,
        Arc::new(InMemoryPipelineStageRepository::new()),
        Arc::new(clock),
    );

    let mut cursor = placement.open_cursor(workspace, None).await.expect("cursor");
    assert_eq!(cursor.next_position(), 0);
    let placed = placement
        .place(&mut cursor, draft(workspace, "contested"))
        .await
        .expect("retry succeeds");

    assert_eq!(placed.position(), 1);
    assert_eq!(cursor.next_position(), 2);
    assert_eq!(inner.all().expect("listing").len(), 2);
}
