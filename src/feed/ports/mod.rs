//! Port contracts for the feed watcher.
//!
//! The watcher reaches subscriptions, remote feeds and the downstream
//! content generator only through these traits.

pub mod dispatcher;
pub mod fetcher;
pub mod repository;

pub use dispatcher::{ContentGenerationDispatcher, DispatchError, GenerationRequest};
pub use fetcher::{FeedFetchError, FeedFetcher};
pub use repository::{
    FeedSubscriptionRepository, FeedSubscriptionRepositoryError, FeedSubscriptionResult,
};
