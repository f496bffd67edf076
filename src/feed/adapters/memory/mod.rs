//! In-memory adapters for feed watcher tests and local runs.

mod dispatcher;
mod fetcher;
mod subscription;

pub use dispatcher::RecordingDispatcher;
pub use fetcher::StaticFeedFetcher;
pub use subscription::InMemoryFeedSubscriptionRepository;
