//! Domain model for feed subscriptions.
//!
//! A subscription remembers every item identifier it has turned into a
//! task. That seen-set is append-only: nothing in this module can remove an
//! identifier once recorded.

mod error;
mod item;
mod subscription;
mod template;

pub use error::FeedDomainError;
pub use item::FeedItem;
pub use subscription::{
    FeedSubscription, PersistedFeedSubscriptionData, SeenItems, SubscriptionId,
};
pub use template::PromptTemplate;
