//! Dispatcher that records generation requests instead of sending them.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::feed::ports::{ContentGenerationDispatcher, DispatchError, GenerationRequest};

/// Records every dispatched request; optionally fails them all.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    requests: Vec<GenerationRequest>,
    failing: bool,
}

impl RecordingDispatcher {
    /// Creates a dispatcher that accepts every request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher that records and then rejects every request.
    #[must_use]
    pub fn failing() -> Self {
        let dispatcher = Self::default();
        if let Ok(mut state) = dispatcher.state.write() {
            state.failing = true;
        }
        dispatcher
    }

    /// Returns the recorded requests in dispatch order.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.state
            .read()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ContentGenerationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, request: &GenerationRequest) -> Result<(), DispatchError> {
        let mut state = self
            .state
            .write()
            .map_err(|err| DispatchError::Transport(err.to_string()))?;
        state.requests.push(request.clone());
        if state.failing {
            return Err(DispatchError::Status { status: 503 });
        }
        Ok(())
    }
}
