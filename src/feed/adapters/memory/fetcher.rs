//! Canned feed documents keyed by URL.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::feed::ports::{FeedFetchError, FeedFetcher};

/// Fetcher that serves pre-registered responses.
///
/// Unknown URLs answer with HTTP 404.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedFetcher {
    state: Arc<RwLock<StaticFetcherState>>,
}

#[derive(Debug, Default)]
struct StaticFetcherState {
    responses: HashMap<String, Result<String, FeedFetchError>>,
    requested: Vec<String>,
}

impl StaticFeedFetcher {
    /// Creates a fetcher with no registered documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `document` for `url`.
    pub fn serve(&self, url: impl Into<String>, document: impl Into<String>) {
        self.respond(url, Ok(document.into()));
    }

    /// Fails every fetch of `url` with `error`.
    pub fn fail(&self, url: impl Into<String>, error: FeedFetchError) {
        self.respond(url, Err(error));
    }

    /// Returns the URLs fetched so far, in call order.
    #[must_use]
    pub fn requested(&self) -> Vec<String> {
        self.state
            .read()
            .map(|state| state.requested.clone())
            .unwrap_or_default()
    }

    fn respond(&self, url: impl Into<String>, response: Result<String, FeedFetchError>) {
        if let Ok(mut state) = self.state.write() {
            state.responses.insert(url.into(), response);
        }
    }
}

#[async_trait]
impl FeedFetcher for StaticFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FeedFetchError> {
        let mut state = self
            .state
            .write()
            .map_err(|err| FeedFetchError::Transport(err.to_string()))?;
        state.requested.push(url.to_owned());
        state
            .responses
            .get(url)
            .cloned()
            .unwrap_or(Err(FeedFetchError::Status { status: 404 }))
    }
}
