//! Feed fetching over HTTP.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::feed::ports::{FeedFetchError, FeedFetcher};

/// `reqwest`-backed fetcher with a bounded timeout and identifying agent.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    http: Client,
}

impl HttpFeedFetcher {
    /// Builds a fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`FeedFetchError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FeedFetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|err| FeedFetchError::Transport(err.to_string()))?;
        Ok(Self { http })
    }
}

fn status_error(status: StatusCode) -> Option<FeedFetchError> {
    if status.is_success() {
        None
    } else {
        Some(FeedFetchError::Status {
            status: status.as_u16(),
        })
    }
}

fn transport_error(err: &reqwest::Error) -> FeedFetchError {
    if err.is_timeout() {
        FeedFetchError::Timeout
    } else {
        FeedFetchError::Transport(err.to_string())
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FeedFetchError> {
        debug!(url, "fetching feed");
        let response = self
            .http
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "application/rss+xml, application/xml, text/xml;q=0.9, */*;q=0.8",
            )
            .send()
            .await
            .map_err(|err| transport_error(&err))?;
        if let Some(err) = status_error(response.status()) {
            return Err(err);
        }
        response.text().await.map_err(|err| transport_error(&err))
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpFeedFetcher, status_error};
    use crate::feed::ports::FeedFetchError;
    use reqwest::StatusCode;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    #[case(StatusCode::OK, None)]
    #[case(StatusCode::NOT_FOUND, Some(FeedFetchError::Status { status: 404 }))]
    #[case(StatusCode::BAD_GATEWAY, Some(FeedFetchError::Status { status: 502 }))]
    fn maps_non_success_statuses(
        #[case] status: StatusCode,
        #[case] expected: Option<FeedFetchError>,
    ) {
        assert_eq!(status_error(status), expected);
    }

    #[rstest]
    fn builds_with_custom_agent() {
        let fetcher = HttpFeedFetcher::new(Duration::from_secs(5), "contentplan-feed-watcher/0.1");
        assert!(fetcher.is_ok());
    }
}
