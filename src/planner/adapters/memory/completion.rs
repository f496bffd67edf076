//! Completion client that replays scripted answers.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use crate::planner::ports::{Completion, CompletionClient, CompletionError, CompletionRequest};

/// Replays queued answers in order and records every request.
///
/// Once the queue is empty, every call fails with HTTP 503.
#[derive(Debug, Clone)]
pub struct ScriptedCompletionClient {
    model: String,
    state: Arc<RwLock<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    answers: VecDeque<Result<String, CompletionError>>,
    requests: Vec<CompletionRequest>,
}

impl ScriptedCompletionClient {
    /// Creates a client reporting `model` as its model name.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            state: Arc::new(RwLock::new(ScriptState::default())),
        }
    }

    /// Queues a successful answer.
    #[must_use]
    pub fn answering(self, text: impl Into<String>) -> Self {
        self.enqueue(Ok(text.into()));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn failing(self, error: CompletionError) -> Self {
        self.enqueue(Err(error));
        self
    }

    /// Returns the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.state
            .read()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    fn enqueue(&self, answer: Result<String, CompletionError>) {
        if let Ok(mut state) = self.state.write() {
            state.answers.push_back(answer);
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        let mut state = self
            .state
            .write()
            .map_err(|err| CompletionError::Transport(err.to_string()))?;
        state.requests.push(request.clone());
        let answer = state.answers.pop_front().unwrap_or_else(|| {
            Err(CompletionError::Status {
                status: 503,
                message: "no scripted answer left".to_owned(),
            })
        })?;
        Ok(Completion {
            text: answer,
            model: self.model.clone(),
        })
    }
}
