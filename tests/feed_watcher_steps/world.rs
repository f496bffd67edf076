//! Shared world state for feed watcher BDD scenarios.

use std::sync::Arc;

use contentplan::{
    feed::{
        adapters::memory::{
            InMemoryFeedSubscriptionRepository, RecordingDispatcher, StaticFeedFetcher,
        },
        services::{FeedWatcher, FeedWatcherError, WatchReport},
    },
    pipeline::{
        adapters::memory::{InMemoryPipelineStageRepository, InMemoryPlanningTaskRepository},
        domain::{PipelineStage, WorkspaceId},
        services::TaskPlacement,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Watcher type used by the BDD world.
pub type TestWatcher = FeedWatcher<
    InMemoryFeedSubscriptionRepository,
    StaticFeedFetcher,
    RecordingDispatcher,
    InMemoryPlanningTaskRepository,
    InMemoryPipelineStageRepository,
    DefaultClock,
>;

/// Scenario world for feed watcher behaviour tests.
pub struct FeedWorld {
    pub workspace: WorkspaceId,
    pub subscriptions: Arc<InMemoryFeedSubscriptionRepository>,
    pub fetcher: Arc<StaticFeedFetcher>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub tasks: Arc<InMemoryPlanningTaskRepository>,
    pub stages: Arc<InMemoryPipelineStageRepository>,
    pub stage: Option<PipelineStage>,
    pub last_report: Option<Result<WatchReport, FeedWatcherError>>,
}

impl FeedWorld {
    /// Creates a world with empty repositories.
    #[must_use]
    pub fn new() -> Self {
        Self {
            workspace: WorkspaceId::new(),
            subscriptions: Arc::new(InMemoryFeedSubscriptionRepository::new()),
            fetcher: Arc::new(StaticFeedFetcher::new()),
            dispatcher: Arc::new(RecordingDispatcher::new()),
            tasks: Arc::new(InMemoryPlanningTaskRepository::new()),
            stages: Arc::new(InMemoryPipelineStageRepository::new()),
            stage: None,
            last_report: None,
        }
    }

    /// Builds a watcher over the world's adapters.
    #[must_use]
    pub fn watcher(&self) -> TestWatcher {
        let clock = Arc::new(DefaultClock);
        let placement = TaskPlacement::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.stages),
            Arc::clone(&clock),
        );
        FeedWatcher::new(
            Arc::clone(&self.subscriptions),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.dispatcher),
            placement,
            clock,
        )
    }

    /// Returns the last successful report.
    ///
    /// # Errors
    ///
    /// Fails when the watcher has not run or the run failed.
    pub fn report(&self) -> Result<&WatchReport, eyre::Report> {
        self.last_report
            .as_ref()
            .ok_or_else(|| eyre::eyre!("the feed watcher has not run"))?
            .as_ref()
            .map_err(|err| eyre::eyre!("feed watcher run failed: {err}"))
    }
}

impl Default for FeedWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> FeedWorld {
    FeedWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
