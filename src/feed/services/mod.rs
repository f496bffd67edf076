//! Feed watcher orchestration.

mod watcher;

pub use watcher::{
    FeedWatcher, FeedWatcherError, SubscriptionCheckError, SubscriptionReport, WatchReport,
    WatcherSettings,
};
