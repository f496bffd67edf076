//! Entry-point handlers wrapping the job services.

use super::envelope::{JobResponse, PlanEnvelope, WatchEnvelope};
use crate::feed::{
    ports::{ContentGenerationDispatcher, FeedFetcher, FeedSubscriptionRepository},
    services::FeedWatcher,
};
use crate::pipeline::ports::{PipelineStageRepository, PlanningTaskRepository};
use crate::planner::{
    domain::PlanningRequest,
    ports::{ClientHistoryRepository, CompletionClient},
    services::PlanningRequestInterpreter,
};
use mockable::Clock;
use std::time::Duration;
use tokio::time::timeout;
use tracing::error;

const INTERNAL_ERROR: u16 = 500;
const BAD_REQUEST: u16 = 400;
const GATEWAY_TIMEOUT: u16 = 504;

fn timed_out(job: &str, limit: Duration) -> JobResponse {
    error!(job, limit_ms = limit.as_millis(), "job exceeded its time limit");
    JobResponse::failure(
        GATEWAY_TIMEOUT,
        format!("{job} did not finish within {}ms", limit.as_millis()),
    )
}

/// Runs the feed watcher under `limit` and wraps its report.
///
/// Only a failure to list subscriptions or an expired limit yields a
/// non-2xx response. Work already persisted when the limit expires stays
/// persisted.
pub async fn watch_feeds<R, F, D, T, S, C>(
    watcher: &FeedWatcher<R, F, D, T, S, C>,
    limit: Duration,
) -> JobResponse
where
    R: FeedSubscriptionRepository,
    F: FeedFetcher,
    D: ContentGenerationDispatcher + 'static,
    T: PlanningTaskRepository,
    S: PipelineStageRepository,
    C: Clock + Send + Sync,
{
    match timeout(limit, watcher.run()).await {
        Ok(Ok(report)) => JobResponse::new(200, &WatchEnvelope::from(report)),
        Ok(Err(err)) => {
            error!(error = %err, "feed watcher run failed");
            JobResponse::failure(INTERNAL_ERROR, err.to_string())
        }
        Err(_) => timed_out("feed watcher run", limit),
    }
}

/// Parses a JSON request body and runs the planning interpreter under
/// `limit`.
///
/// A body that is not a JSON object is answered with 400, an expired
/// limit with 504.
pub async fn plan<H, M, T, S, C>(
    interpreter: &PlanningRequestInterpreter<H, M, T, S, C>,
    body: &str,
    limit: Duration,
) -> JobResponse
where
    H: ClientHistoryRepository,
    M: CompletionClient,
    T: PlanningTaskRepository,
    S: PipelineStageRepository,
    C: Clock + Send + Sync,
{
    let request = match serde_json::from_str::<PlanningRequest>(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            return JobResponse::failure(BAD_REQUEST, format!("malformed request body: {err}"));
        }
    };
    match timeout(limit, interpreter.interpret(request)).await {
        Err(_) => timed_out("planning request", limit),
        Ok(Ok(outcome)) => JobResponse::new(200, &PlanEnvelope::from(outcome)),
        Ok(Err(err)) => {
            error!(
                error = %err,
                retryable = err.is_retryable(),
                "planning request failed"
            );
            JobResponse::failure(err.status_code(), err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{plan, watch_feeds};
    use crate::planner::ports::{Completion, CompletionClient, CompletionError, CompletionRequest};
    use async_trait::async_trait;
    use crate::feed::{
        adapters::memory::{
            InMemoryFeedSubscriptionRepository, RecordingDispatcher, StaticFeedFetcher,
        },
        domain::FeedSubscription,
        ports::FeedSubscriptionRepository,
        services::FeedWatcher,
    };
    use crate::pipeline::{
        adapters::memory::{InMemoryPipelineStageRepository, InMemoryPlanningTaskRepository},
        domain::{ClientId, PipelineStage, UserId, WorkspaceId},
        ports::PipelineStageRepository,
        services::TaskPlacement,
    };
    use crate::planner::{
        adapters::memory::{InMemoryClientHistory, ScriptedCompletionClient},
        domain::ClientProfile,
        services::{PlannerSettings, PlanningRequestInterpreter},
    };
    use crate::test_support::FixedClock;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const LIMIT: Duration = Duration::from_secs(30);

    /// Completion client that answers only after a long pause.
    struct StalledCompletion;

    #[async_trait]
    impl CompletionClient for StalledCompletion {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<Completion, CompletionError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(CompletionError::Timeout)
        }
    }

    fn placement(
        stages: Arc<InMemoryPipelineStageRepository>,
    ) -> TaskPlacement<InMemoryPlanningTaskRepository, InMemoryPipelineStageRepository, FixedClock>
    {
        TaskPlacement::new(
            Arc::new(InMemoryPlanningTaskRepository::new()),
            stages,
            Arc::new(FixedClock::at(2026, 1, 5)),
        )
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn wraps_watch_reports() {
        let workspace = WorkspaceId::new();
        let subscriptions = Arc::new(InMemoryFeedSubscriptionRepository::new());
        let subscription = FeedSubscription::new(workspace, "Down", "https://down.example.com/rss")
            .expect("valid subscription");
        subscriptions.store(&subscription).await.expect("stored");
        let watcher = FeedWatcher::new(
            subscriptions,
            Arc::new(StaticFeedFetcher::new()),
            Arc::new(RecordingDispatcher::new()),
            placement(Arc::new(InMemoryPipelineStageRepository::new())),
            Arc::new(FixedClock::at(2026, 1, 5)),
        );

        let response = watch_feeds(&watcher, LIMIT).await;

        assert_eq!(response.status, 200);
        assert_eq!(response.body["success"], json!(true));
        assert_eq!(response.body["subscriptionsProcessed"], json!(1));
        assert_eq!(response.body["results"][0]["newItems"], json!(0));
        assert_eq!(
            response.body["results"][0]["error"],
            json!("feed responded with HTTP 404")
        );
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn reports_listing_failures_as_server_errors() {
        let subscriptions = Arc::new(InMemoryFeedSubscriptionRepository::new());
        subscriptions.fail_listing().expect("failure armed");
        let watcher = FeedWatcher::new(
            subscriptions,
            Arc::new(StaticFeedFetcher::new()),
            Arc::new(RecordingDispatcher::new()),
            placement(Arc::new(InMemoryPipelineStageRepository::new())),
            Arc::new(FixedClock::at(2026, 1, 5)),
        );

        let response = watch_feeds(&watcher, LIMIT).await;

        assert_eq!(response.status, 500);
        assert!(!response.is_success());
        assert_eq!(response.body["success"], json!(false));
    }

    #[rstest]
    #[case::not_json("{not json", 400)]
    #[case::wrong_shape("[1, 2, 3]", 400)]
    #[case::missing_ids("{}", 400)]
    #[tokio::test(flavor = "multi_thread")]
    async fn rejects_bad_planning_bodies(#[case] body: &str, #[case] status: u16) {
        let interpreter = PlanningRequestInterpreter::new(
            Arc::new(InMemoryClientHistory::new()),
            Arc::new(ScriptedCompletionClient::new("gpt-test")),
            placement(Arc::new(InMemoryPipelineStageRepository::new())),
            Arc::new(FixedClock::at(2026, 1, 5)),
            PlannerSettings::default(),
        );

        let response = plan(&interpreter, body, LIMIT).await;

        assert_eq!(response.status, status);
        assert_eq!(response.body["success"], json!(false));
        assert!(response.body["error"].is_string());
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn wraps_planning_outcomes() {
        let workspace = WorkspaceId::new();
        let client = ClientId::new();
        let history = Arc::new(InMemoryClientHistory::new());
        history
            .add_profile(ClientProfile {
                id: client,
                name: "Padaria Sol".to_owned(),
                description: None,
                identity_guide: None,
            })
            .expect("profile stored");
        let stages = Arc::new(InMemoryPipelineStageRepository::new());
        let stage = PipelineStage::new(workspace, "Ideias", 0, "idea").expect("valid stage");
        stages.store(&stage).await.expect("stage stored");
        let answer = r#"{"ideas":[{"title":"Bread 101","description":"d","format":"blog","objective":"o","hook":"h"}]}"#;
        let interpreter = PlanningRequestInterpreter::new(
            history,
            Arc::new(ScriptedCompletionClient::new("gpt-test").answering(answer)),
            placement(stages),
            Arc::new(FixedClock::at(2026, 1, 5)),
            PlannerSettings::default(),
        );
        let body = json!({
            "clientId": client.to_string(),
            "workspaceId": workspace.to_string(),
            "userId": UserId::new().to_string(),
            "quantity": 1,
            "dateHint": "20/01/2026",
        })
        .to_string();

        let response = plan(&interpreter, &body, LIMIT).await;

        assert_eq!(response.status, 200);
        assert_eq!(response.body["success"], json!(true));
        assert_eq!(response.body["clientName"], json!("Padaria Sol"));
        assert_eq!(response.body["column"], json!("Ideias"));
        assert_eq!(response.body["cards"][0]["title"], json!("Bread 101"));
        assert_eq!(response.body["cards"][0]["format"], json!("blog"));
        assert_eq!(response.body["cards"][0]["column"], json!("Ideias"));
        assert_eq!(response.body["cards"][0]["dueDate"], json!("2026-01-20"));
        assert_eq!(response.body["ideas"][0]["hook"], json!("h"));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn stalled_planning_requests_time_out() {
        let workspace = WorkspaceId::new();
        let client = ClientId::new();
        let history = Arc::new(InMemoryClientHistory::new());
        history
            .add_profile(ClientProfile {
                id: client,
                name: "Padaria Sol".to_owned(),
                description: None,
                identity_guide: None,
            })
            .expect("profile stored");
        let interpreter = PlanningRequestInterpreter::new(
            history,
            Arc::new(StalledCompletion),
            placement(Arc::new(InMemoryPipelineStageRepository::new())),
            Arc::new(FixedClock::at(2026, 1, 5)),
            PlannerSettings::default(),
        );
        let body = json!({
            "clientId": client.to_string(),
            "workspaceId": workspace.to_string(),
            "userId": UserId::new().to_string(),
        })
        .to_string();

        let response = plan(&interpreter, &body, Duration::from_millis(50)).await;

        assert_eq!(response.status, 504);
        assert_eq!(response.body["success"], json!(false));
        assert_eq!(
            response.body["error"],
            json!("planning request did not finish within 50ms")
        );
    }
}
