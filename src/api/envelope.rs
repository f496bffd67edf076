//! Response bodies.

use crate::feed::services::{SubscriptionReport, WatchReport};
use crate::planner::{
    domain::ContentIdea,
    services::{PlannedCard, PlanningOutcome},
};
use serde::Serialize;
use serde_json::Value;

/// Status code and JSON body produced by an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Serialised envelope.
    pub body: Value,
}

impl JobResponse {
    /// Wraps `envelope` with `status`.
    #[must_use]
    pub fn new(status: u16, envelope: &impl Serialize) -> Self {
        let body = serde_json::to_value(envelope).unwrap_or_else(|err| {
            serde_json::json!({ "success": false, "error": err.to_string() })
        });
        Self { status, body }
    }

    /// Builds a failure response.
    #[must_use]
    pub fn failure(status: u16, error: impl Into<String>) -> Self {
        Self::new(
            status,
            &ErrorEnvelope {
                success: false,
                error: error.into(),
            },
        )
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    /// Human-readable failure.
    pub error: String,
}

/// Body of a successful feed watcher run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEnvelope {
    /// Always `true`.
    pub success: bool,
    /// Number of active subscriptions examined.
    pub subscriptions_processed: usize,
    /// Per-subscription outcomes.
    pub results: Vec<SubscriptionReport>,
}

impl From<WatchReport> for WatchEnvelope {
    fn from(report: WatchReport) -> Self {
        Self {
            success: true,
            subscriptions_processed: report.subscriptions_processed,
            results: report.results,
        }
    }
}

/// Body of a successful planning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEnvelope {
    /// Always `true`.
    pub success: bool,
    /// Summary for the user.
    pub message: String,
    /// Client planned for.
    pub client_name: String,
    /// Stage the tasks landed in.
    pub column: String,
    /// Requested format, if any.
    pub format: Option<String>,
    /// Stored tasks.
    pub cards: Vec<PlannedCard>,
    /// Ideas the batch was built from.
    pub ideas: Vec<ContentIdea>,
}

impl From<PlanningOutcome> for PlanEnvelope {
    fn from(outcome: PlanningOutcome) -> Self {
        let mut message = format!(
            "Created {} of {} planned tasks for {} in {}.",
            outcome.cards.len(),
            outcome.ideas.len(),
            outcome.client_name,
            outcome.stage_name
        );
        if outcome.used_fallback {
            message.push_str(" The model answer was unusable, so placeholder ideas were created.");
        }
        Self {
            success: true,
            message,
            client_name: outcome.client_name,
            column: outcome.stage_name,
            format: outcome.format,
            cards: outcome.cards,
            ideas: outcome.ideas,
        }
    }
}
