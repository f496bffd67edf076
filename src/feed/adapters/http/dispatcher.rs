//! Content generation dispatch over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::feed::ports::{ContentGenerationDispatcher, DispatchError, GenerationRequest};

/// POSTs generation requests as JSON with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpGenerationDispatcher {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpGenerationDispatcher {
    /// Builds a dispatcher for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotConfigured`] for a blank endpoint and
    /// [`DispatchError::Transport`] when the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let target = endpoint.into();
        if target.trim().is_empty() {
            return Err(DispatchError::NotConfigured);
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DispatchError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            endpoint: target,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ContentGenerationDispatcher for HttpGenerationDispatcher {
    async fn dispatch(&self, request: &GenerationRequest) -> Result<(), DispatchError> {
        debug!(task_id = %request.task_id, endpoint = %self.endpoint, "dispatching generation");
        let mut builder = self.http.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder
            .send()
            .await
            .map_err(|err| DispatchError::Transport(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DispatchError::Status {
                status: status.as_u16(),
            })
        }
    }
}
