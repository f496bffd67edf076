//! Both jobs appending to the same stage.

use super::helpers::{Workspace, workspace};
use contentplan::{
    api,
    feed::{domain::FeedSubscription, ports::FeedSubscriptionRepository},
    pipeline::domain::{PlanningTask, UserId},
};
use rstest::rstest;
use serde_json::json;
use std::time::Duration;

const LIMIT: Duration = Duration::from_secs(30);

const FEED_URL: &str = "https://blog.example.com/feed";

const FEED: &str = "<rss><channel>\
    <item><title>Oven tips</title><link>https://blog.example.com/oven</link></item>\
    </channel></rss>";

const ANSWER: &str = r#"{"ideas": [
    {"title": "Croissant week", "description": "d", "format": "reels", "objective": "o", "hook": "h"},
    {"title": "Flour guide", "description": "d", "format": "blog", "objective": "o", "hook": "h"}
]}"#;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn planner_continues_after_feed_tasks_in_the_same_stage(workspace: Workspace) {
    let ideas = workspace.stage("Ideias", 0, "idea").await;
    workspace.stage("Rascunho", 1, "draft").await;
    let subscription = FeedSubscription::new(workspace.id, "Blog", FEED_URL)
        .expect("valid subscription")
        .with_client(Some(workspace.client));
    workspace
        .subscriptions
        .store(&subscription)
        .await
        .expect("subscription stored");
    workspace.fetcher.serve(FEED_URL, FEED);

    let watch = api::watch_feeds(&workspace.watcher(), LIMIT).await;
    let body = json!({
        "clientId": workspace.client.to_string(),
        "workspaceId": workspace.id.to_string(),
        "userId": UserId::new().to_string(),
        "quantity": 2,
        "column": "ideias",
    })
    .to_string();
    let plan = api::plan(&workspace.interpreter(ANSWER), &body, LIMIT).await;

    assert_eq!(watch.status, 200);
    assert_eq!(watch.body["results"][0]["newItems"], json!(1));
    assert_eq!(plan.status, 200);
    assert_eq!(plan.body["column"], json!("Ideias"));
    let tasks = workspace.tasks.all().expect("tasks listed");
    let placed: Vec<(&str, i32)> = tasks
        .iter()
        .filter(|task| task.stage_id() == Some(ideas.id()))
        .map(|task| (task.title(), task.position()))
        .collect();
    assert_eq!(
        placed,
        vec![
            ("[RSS] Oven tips", 0),
            ("Croissant week", 1),
            ("Flour guide", 2)
        ]
    );
    assert!(
        tasks
            .iter()
            .all(|task| task.client_id() == Some(workspace.client))
    );
    let platforms: Vec<Option<&str>> = tasks.iter().map(PlanningTask::platform).collect();
    assert_eq!(platforms, vec![None, Some("instagram"), Some("blog")]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn planner_without_stages_reports_unprocessable(workspace: Workspace) {
    let body = json!({
        "clientId": workspace.client.to_string(),
        "workspaceId": workspace.id.to_string(),
        "userId": UserId::new().to_string(),
    })
    .to_string();

    let plan = api::plan(&workspace.interpreter(ANSWER), &body, LIMIT).await;

    assert_eq!(plan.status, 422);
    assert_eq!(plan.body["success"], json!(false));
    assert!(workspace.tasks.all().expect("tasks listed").is_empty());
}
