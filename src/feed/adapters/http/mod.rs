//! HTTP adapters built on `reqwest`.

mod dispatcher;
mod fetcher;

pub use dispatcher::HttpGenerationDispatcher;
pub use fetcher::HttpFeedFetcher;
