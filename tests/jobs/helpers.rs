//! Shared fixtures for job integration tests.

use std::sync::Arc;

use contentplan::{
    feed::{
        adapters::memory::{
            InMemoryFeedSubscriptionRepository, RecordingDispatcher, StaticFeedFetcher,
        },
        services::FeedWatcher,
    },
    pipeline::{
        adapters::memory::{InMemoryPipelineStageRepository, InMemoryPlanningTaskRepository},
        domain::{ClientId, PipelineStage, WorkspaceId},
        ports::PipelineStageRepository,
        services::TaskPlacement,
    },
    planner::{
        adapters::memory::{InMemoryClientHistory, ScriptedCompletionClient},
        domain::ClientProfile,
        services::{PlannerSettings, PlanningRequestInterpreter},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Watcher over the shared in-memory adapters.
pub type Watcher = FeedWatcher<
    InMemoryFeedSubscriptionRepository,
    StaticFeedFetcher,
    RecordingDispatcher,
    InMemoryPlanningTaskRepository,
    InMemoryPipelineStageRepository,
    DefaultClock,
>;

/// Interpreter over the shared in-memory adapters.
pub type Interpreter = PlanningRequestInterpreter<
    InMemoryClientHistory,
    ScriptedCompletionClient,
    InMemoryPlanningTaskRepository,
    InMemoryPipelineStageRepository,
    DefaultClock,
>;

/// Adapters shared by both jobs.
pub struct Workspace {
    pub id: WorkspaceId,
    pub client: ClientId,
    pub tasks: Arc<InMemoryPlanningTaskRepository>,
    pub stages: Arc<InMemoryPipelineStageRepository>,
    pub subscriptions: Arc<InMemoryFeedSubscriptionRepository>,
    pub fetcher: Arc<StaticFeedFetcher>,
    pub history: Arc<InMemoryClientHistory>,
    clock: Arc<DefaultClock>,
}

impl Workspace {
    fn placement(
        &self,
    ) -> TaskPlacement<InMemoryPlanningTaskRepository, InMemoryPipelineStageRepository, DefaultClock>
    {
        TaskPlacement::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.stages),
            Arc::clone(&self.clock),
        )
    }

    /// Builds a feed watcher.
    pub fn watcher(&self) -> Watcher {
        FeedWatcher::new(
            Arc::clone(&self.subscriptions),
            Arc::clone(&self.fetcher),
            Arc::new(RecordingDispatcher::new()),
            self.placement(),
            Arc::clone(&self.clock),
        )
    }

    /// Builds an interpreter answering with `answer`.
    pub fn interpreter(&self, answer: &str) -> Interpreter {
        PlanningRequestInterpreter::new(
            Arc::clone(&self.history),
            Arc::new(ScriptedCompletionClient::new("gpt-test").answering(answer)),
            self.placement(),
            Arc::clone(&self.clock),
            PlannerSettings::default(),
        )
    }

    /// Stores a stage.
    pub async fn stage(&self, name: &str, position: i32, column_type: &str) -> PipelineStage {
        let stage = PipelineStage::new(self.id, name, position, column_type).expect("valid stage");
        self.stages.store(&stage).await.expect("stage stored");
        stage
    }
}

/// Workspace with one client profile.
#[fixture]
pub fn workspace() -> Workspace {
    let client = ClientId::new();
    let history = Arc::new(InMemoryClientHistory::new());
    history
        .add_profile(ClientProfile {
            id: client,
            name: "Padaria Sol".to_owned(),
            description: Some("Neighbourhood bakery".to_owned()),
            identity_guide: None,
        })
        .expect("profile stored");
    Workspace {
        id: WorkspaceId::new(),
        client,
        tasks: Arc::new(InMemoryPlanningTaskRepository::new()),
        stages: Arc::new(InMemoryPipelineStageRepository::new()),
        subscriptions: Arc::new(InMemoryFeedSubscriptionRepository::new()),
        fetcher: Arc::new(StaticFeedFetcher::new()),
        history,
        clock: Arc::new(DefaultClock),
    }
}
