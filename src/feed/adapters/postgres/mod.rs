//! `PostgreSQL` adapter for feed subscriptions.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresFeedSubscriptionRepository;
