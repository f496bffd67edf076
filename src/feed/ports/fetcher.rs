//! Port for retrieving raw feed documents.

use async_trait::async_trait;
use thiserror::Error;

/// Fetches a feed document over the network.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Returns the body of the document at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedFetchError`] for non-success responses, timeouts and
    /// transport failures.
    async fn fetch(&self, url: &str) -> Result<String, FeedFetchError>;
}

/// Errors returned while fetching a feed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedFetchError {
    /// The server answered with a non-success status.
    #[error("feed responded with HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The request did not complete in time.
    #[error("feed request timed out")]
    Timeout,

    /// Connection, TLS or body decoding failure.
    #[error("feed transport error: {0}")]
    Transport(String),
}
