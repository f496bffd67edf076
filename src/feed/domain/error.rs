//! Error types for feed domain validation.

use thiserror::Error;

/// Errors returned while constructing feed domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedDomainError {
    /// The subscription name is empty after trimming.
    #[error("subscription name must not be empty")]
    EmptyName,

    /// The feed URL is not an absolute http(s) URL.
    #[error("invalid feed url '{0}', expected an http or https url")]
    InvalidFeedUrl(String),
}
