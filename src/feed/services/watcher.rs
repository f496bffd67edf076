//! Polls feed subscriptions and turns unseen items into planning tasks.

use crate::feed::{
    domain::{FeedItem, FeedSubscription, SubscriptionId},
    parser::parse_feed,
    ports::{
        ContentGenerationDispatcher, FeedFetchError, FeedFetcher, FeedSubscriptionRepository,
        FeedSubscriptionRepositoryError, GenerationRequest,
    },
};
use crate::pipeline::{
    domain::{
        PipelineStage, PlanningTask, PlanningTaskDraft, TaskMetadata, TaskStatus,
        first_stage_by_position,
    },
    ports::{PipelineStageRepository, PlanningTaskRepository},
    services::{PlacementError, TaskPlacement},
};
use futures::{StreamExt, future::join_all, stream};
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const TITLE_PREFIX: &str = "[RSS] ";

/// Tuning knobs for a watcher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatcherSettings {
    /// Subscriptions processed at once; `1` processes them sequentially.
    pub max_concurrent_subscriptions: usize,
    /// How long the run waits for outstanding generation dispatches.
    pub dispatch_grace_period: Duration,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            max_concurrent_subscriptions: 1,
            dispatch_grace_period: Duration::from_secs(5),
        }
    }
}

/// Outcome of one subscription within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionReport {
    /// Subscription checked.
    pub subscription_id: SubscriptionId,
    /// Tasks created from unseen items.
    pub new_items: usize,
    /// Failure description when the check did not complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a watcher run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchReport {
    /// Number of active subscriptions examined.
    pub subscriptions_processed: usize,
    /// Per-subscription outcomes in listing order.
    pub results: Vec<SubscriptionReport>,
}

impl WatchReport {
    /// Total tasks created across all subscriptions.
    #[must_use]
    pub fn total_new_items(&self) -> usize {
        self.results.iter().map(|result| result.new_items).sum()
    }
}

/// Fatal errors that abort a whole run.
#[derive(Debug, Error)]
pub enum FeedWatcherError {
    /// Active subscriptions could not be listed.
    #[error("failed to list feed subscriptions: {0}")]
    Subscriptions(#[from] FeedSubscriptionRepositoryError),
}

/// Errors confined to a single subscription.
#[derive(Debug, Error)]
pub enum SubscriptionCheckError {
    /// The feed could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FeedFetchError),
    /// Stage lookup or position allocation failed.
    #[error(transparent)]
    Placement(#[from] PlacementError),
    /// The watermark could not be persisted.
    #[error("failed to persist watermark: {0}")]
    Watermark(#[from] FeedSubscriptionRepositoryError),
}

/// Feed watcher service.
///
/// Each subscription is its own failure boundary: a failing feed is
/// reported and the run moves on. Items inside a subscription are handled
/// sequentially so stage positions stay contiguous.
pub struct FeedWatcher<R, F, D, T, S, C>
where
    R: FeedSubscriptionRepository,
    F: FeedFetcher,
    D: ContentGenerationDispatcher + 'static,
    T: PlanningTaskRepository,
    S: PipelineStageRepository,
    C: Clock + Send + Sync,
{
    subscriptions: Arc<R>,
    fetcher: Arc<F>,
    dispatcher: Arc<D>,
    placement: TaskPlacement<T, S, C>,
    clock: Arc<C>,
    settings: WatcherSettings,
}

struct CheckState {
    created: usize,
    dispatches: Vec<JoinHandle<()>>,
}

impl<R, F, D, T, S, C> FeedWatcher<R, F, D, T, S, C>
where
    R: FeedSubscriptionRepository,
    F: FeedFetcher,
    D: ContentGenerationDispatcher + 'static,
    T: PlanningTaskRepository,
    S: PipelineStageRepository,
    C: Clock + Send + Sync,
{
    /// Creates a watcher with default settings.
    #[must_use]
    pub fn new(
        subscriptions: Arc<R>,
        fetcher: Arc<F>,
        dispatcher: Arc<D>,
        placement: TaskPlacement<T, S, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            subscriptions,
            fetcher,
            dispatcher,
            placement,
            clock,
            settings: WatcherSettings::default(),
        }
    }

    /// Replaces the run settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: WatcherSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Checks every active subscription once.
    ///
    /// # Errors
    ///
    /// Returns [`FeedWatcherError::Subscriptions`] when the subscription
    /// listing fails. Every other failure is reported per subscription.
    pub async fn run(&self) -> Result<WatchReport, FeedWatcherError> {
        let active = self.subscriptions.list_active().await?;
        info!(count = active.len(), "checking feed subscriptions");

        let outcomes: Vec<(SubscriptionReport, Vec<JoinHandle<()>>)> = stream::iter(active)
            .map(|subscription| self.process(subscription))
            .buffered(self.settings.max_concurrent_subscriptions.max(1))
            .collect()
            .await;

        let mut results = Vec::with_capacity(outcomes.len());
        let mut dispatches = Vec::new();
        for (report, handles) in outcomes {
            results.push(report);
            dispatches.extend(handles);
        }
        self.settle_dispatches(dispatches).await;

        let report = WatchReport {
            subscriptions_processed: results.len(),
            results,
        };
        info!(
            subscriptions = report.subscriptions_processed,
            new_items = report.total_new_items(),
            "feed check finished"
        );
        Ok(report)
    }

    async fn process(
        &self,
        mut subscription: FeedSubscription,
    ) -> (SubscriptionReport, Vec<JoinHandle<()>>) {
        let subscription_id = subscription.id();
        let mut state = CheckState {
            created: 0,
            dispatches: Vec::new(),
        };
        let error = match self.check(&mut subscription, &mut state).await {
            Ok(()) => {
                debug!(%subscription_id, new_items = state.created, "subscription checked");
                None
            }
            Err(err) => {
                warn!(%subscription_id, error = %err, "subscription check failed");
                Some(err.to_string())
            }
        };
        let report = SubscriptionReport {
            subscription_id,
            new_items: state.created,
            error,
        };
        (report, state.dispatches)
    }

    async fn check(
        &self,
        subscription: &mut FeedSubscription,
        state: &mut CheckState,
    ) -> Result<(), SubscriptionCheckError> {
        let document = self.fetcher.fetch(subscription.feed_url()).await?;
        let items = parse_feed(&document);
        let newest_guid = items.first().map(|item| item.guid().to_owned());

        let stage = self.resolve_stage(subscription).await?;
        let status = stage.as_ref().map_or(TaskStatus::Idea, PipelineStage::status);
        let mut cursor = self
            .placement
            .open_cursor(
                subscription.workspace_id(),
                stage.as_ref().map(PipelineStage::id),
            )
            .await?;

        for item in &items {
            // Marked before the insert: a failed item is not retried.
            if !subscription.mark_seen(item.guid()) {
                continue;
            }
            let draft = task_draft(subscription, item, status);
            match self.placement.place(&mut cursor, draft).await {
                Ok(task) => {
                    state.created += 1;
                    if let Some(handle) = self.dispatch_generation(subscription, item, &task) {
                        state.dispatches.push(handle);
                    }
                }
                Err(err) => warn!(
                    subscription_id = %subscription.id(),
                    guid = item.guid(),
                    error = %err,
                    "failed to create task for feed item"
                ),
            }
        }

        subscription.record_check(newest_guid.as_deref(), &*self.clock);
        self.subscriptions.record_watermark(subscription).await?;
        Ok(())
    }

    /// Configured stage when it still exists, else the first stage.
    async fn resolve_stage(
        &self,
        subscription: &FeedSubscription,
    ) -> Result<Option<PipelineStage>, PlacementError> {
        let stages = self.placement.stages(subscription.workspace_id()).await?;
        let configured = subscription
            .stage_id()
            .and_then(|wanted| stages.iter().find(|stage| stage.id() == wanted));
        if configured.is_none() && subscription.stage_id().is_some() {
            warn!(
                subscription_id = %subscription.id(),
                "configured stage missing, falling back to first stage"
            );
        }
        Ok(configured
            .or_else(|| first_stage_by_position(&stages))
            .cloned())
    }

    fn dispatch_generation(
        &self,
        subscription: &FeedSubscription,
        item: &FeedItem,
        task: &PlanningTask,
    ) -> Option<JoinHandle<()>> {
        let template = subscription.generation_template()?;
        let request = GenerationRequest {
            task_id: task.id(),
            prompt: template.render(item, subscription.content_type()),
            workspace_id: task.workspace_id(),
            subscription_id: Some(subscription.id()),
        };
        let dispatcher = Arc::clone(&self.dispatcher);
        Some(tokio::spawn(async move {
            match dispatcher.dispatch(&request).await {
                Ok(()) => debug!(task_id = %request.task_id, "generation dispatched"),
                Err(err) => warn!(
                    task_id = %request.task_id,
                    error = %err,
                    "generation dispatch failed"
                ),
            }
        }))
    }

    async fn settle_dispatches(&self, dispatches: Vec<JoinHandle<()>>) {
        if dispatches.is_empty() {
            return;
        }
        let pending = dispatches.len();
        match tokio::time::timeout(self.settings.dispatch_grace_period, join_all(dispatches)).await
        {
            Ok(joined) => {
                for failure in joined.into_iter().filter_map(Result::err) {
                    warn!(error = %failure, "generation dispatch task aborted");
                }
            }
            Err(_) => warn!(pending, "generation dispatches still running after grace period"),
        }
    }
}

fn task_draft(
    subscription: &FeedSubscription,
    item: &FeedItem,
    status: TaskStatus,
) -> PlanningTaskDraft {
    PlanningTaskDraft::new(
        subscription.workspace_id(),
        format!("{TITLE_PREFIX}{}", item.display_title()),
        status,
    )
    .with_client(subscription.client_id())
    .with_description(item.description())
    .with_platform(subscription.platform().map(str::to_owned))
    .with_content_type(subscription.content_type().map(str::to_owned))
    .with_metadata(provenance(subscription, item))
}

fn provenance(subscription: &FeedSubscription, item: &FeedItem) -> TaskMetadata {
    let entries = [
        ("source", "rss".to_owned()),
        ("feed_url", subscription.feed_url().to_owned()),
        ("item_link", item.link().to_owned()),
        ("item_guid", item.guid().to_owned()),
        ("pub_date", item.pub_date().to_owned()),
        ("subscription_id", subscription.id().to_string()),
        ("subscription_name", subscription.name().to_owned()),
    ];
    entries
        .into_iter()
        .map(|(key, value)| (key.to_owned(), Value::String(value)))
        .collect()
}
