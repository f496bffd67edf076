//! Context builder tests over the in-memory history.

use std::sync::Arc;

use crate::pipeline::domain::ClientId;
use crate::planner::{
    adapters::memory::InMemoryClientHistory,
    ports::ClientHistoryRepository,
    domain::{
        ClientProfile, ContentLibraryEntry, EngagementMetrics, PerformanceRecord, ReferenceEntry,
    },
    services::{ContextError, ContextLimits, PlanningContextBuilder},
};
use rstest::{fixture, rstest};

struct Fixture {
    client: ClientId,
    history: Arc<InMemoryClientHistory>,
}

impl Fixture {
    fn builder(&self, limits: ContextLimits) -> PlanningContextBuilder<InMemoryClientHistory> {
        PlanningContextBuilder::new(Arc::clone(&self.history), limits)
    }

    fn perform(&self, title: &str, likes: u64, reach: u64) {
        self.history
            .add_performance(
                self.client,
                PerformanceRecord {
                    title: title.to_owned(),
                    format: Some("reels".to_owned()),
                    caption: None,
                    metrics: EngagementMetrics {
                        likes,
                        reach,
                        ..EngagementMetrics::default()
                    },
                },
            )
            .expect("record stored");
    }
}

#[fixture]
fn fixture() -> Fixture {
    let client = ClientId::new();
    let history = Arc::new(InMemoryClientHistory::new());
    history
        .add_profile(ClientProfile {
            id: client,
            name: "Padaria Sol".to_owned(),
            description: Some("Neighbourhood bakery".to_owned()),
            identity_guide: Some("Warm, playful, local.".to_owned()),
        })
        .expect("profile stored");
    Fixture { client, history }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn renders_sections_with_none_lines_for_empty_history(fixture: Fixture) {
    let block = fixture
        .builder(ContextLimits::default())
        .build(fixture.client)
        .await
        .expect("context built");

    assert_eq!(block.client_name(), "Padaria Sol");
    let text = block.as_str();
    assert!(text.starts_with("## Client identity\nName: Padaria Sol"));
    assert!(text.contains("Description: Neighbourhood bakery"));
    assert!(text.contains("Identity guide: Warm, playful, local."));
    assert!(text.contains("## Top-performing content\n- none"));
    assert!(text.contains("## Existing library\nContent library:\n- none\nReferences:\n- none"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ranks_performers_by_score_keeping_insertion_order_on_ties(fixture: Fixture) {
    fixture.perform("low", 1, 10_000);
    fixture.perform("tie-a", 50, 0);
    fixture.perform("top", 90, 0);
    fixture.perform("tie-b", 50, 0);

    let block = fixture
        .builder(ContextLimits {
            top_performers: 3,
            ..ContextLimits::default()
        })
        .build(fixture.client)
        .await
        .expect("context built");

    let text = block.as_str();
    assert!(text.contains("1. top [reels] score 90\n2. tie-a [reels] score 50\n3. tie-b [reels] score 50"));
    assert!(!text.contains("low"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_returns_only_the_requested_top_records(fixture: Fixture) {
    fixture.perform("first", 5, 0);
    fixture.perform("second", 30, 0);
    fixture.perform("third", 20, 0);

    let top = fixture
        .history
        .top_performance_records(fixture.client, 2)
        .await
        .expect("records listed");
    let none = fixture
        .history
        .top_performance_records(fixture.client, 0)
        .await
        .expect("records listed");

    let titles: Vec<&str> = top.iter().map(|record| record.title.as_str()).collect();
    assert_eq!(titles, vec!["second", "third"]);
    assert!(none.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn truncates_identity_guide_to_budget(fixture: Fixture) {
    let client = ClientId::new();
    fixture
        .history
        .add_profile(ClientProfile {
            id: client,
            name: "Verbose".to_owned(),
            description: None,
            identity_guide: Some("é".repeat(40)),
        })
        .expect("profile stored");

    let block = fixture
        .builder(ContextLimits {
            identity_guide_budget: 10,
            ..ContextLimits::default()
        })
        .build(client)
        .await
        .expect("context built");

    let expected = format!("Identity guide: {}…\n", "é".repeat(10));
    assert!(block.as_str().contains(&expected));
    assert!(!block.as_str().contains("Description:"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn samples_newest_library_and_reference_entries(fixture: Fixture) {
    for number in 1..=4 {
        fixture
            .history
            .add_library_entry(
                fixture.client,
                ContentLibraryEntry {
                    title: format!("Post {number}"),
                    format: Some("carousel".to_owned()),
                },
            )
            .expect("entry stored");
    }
    fixture
        .history
        .add_reference(
            fixture.client,
            ReferenceEntry {
                title: "Competitor launch".to_owned(),
                source_url: None,
            },
        )
        .expect("reference stored");

    let block = fixture
        .builder(ContextLimits {
            library_sample: 2,
            ..ContextLimits::default()
        })
        .build(fixture.client)
        .await
        .expect("context built");

    let text = block.as_str();
    assert!(text.contains("Content library:\n- Post 4 (carousel)\n- Post 3 (carousel)\nReferences:"));
    assert!(text.ends_with("References:\n- Competitor launch"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reports_unknown_clients(fixture: Fixture) {
    let missing = ClientId::new();

    let result = fixture
        .builder(ContextLimits::default())
        .build(missing)
        .await;

    assert!(matches!(result, Err(ContextError::ClientNotFound(id)) if id == missing));
}
