//! Port for triggering downstream content generation.

use crate::feed::domain::SubscriptionId;
use crate::pipeline::domain::{PlanningTaskId, WorkspaceId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload sent to the content generator for a freshly created task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Task whose content body should be generated.
    pub task_id: PlanningTaskId,
    /// Rendered prompt.
    pub prompt: String,
    /// Workspace owning the task.
    pub workspace_id: WorkspaceId,
    /// Subscription that produced the task; not sent on the wire.
    #[serde(skip)]
    pub subscription_id: Option<SubscriptionId>,
}

/// Sends generation requests to the downstream generator.
///
/// Calls are fire-and-forget from the watcher's point of view: failures
/// are logged and never affect the run outcome.
#[async_trait]
pub trait ContentGenerationDispatcher: Send + Sync {
    /// Submits one generation request.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the generator rejects or cannot be
    /// reached.
    async fn dispatch(&self, request: &GenerationRequest) -> Result<(), DispatchError>;
}

/// Errors returned by dispatcher implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The generator answered with a non-success status.
    #[error("content generator responded with HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The generator could not be reached.
    #[error("content generator unreachable: {0}")]
    Transport(String),

    /// Dispatching is not configured.
    #[error("content generation endpoint is not configured")]
    NotConfigured,
}
