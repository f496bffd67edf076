//! Feed watching: RSS subscriptions turned into planning tasks.
//!
//! A run lists active subscriptions, fetches each feed, parses it with the
//! regex-driven [`parser`], and places every unseen item as a task through
//! the pipeline placement service. Seen identifiers and the watermark are
//! persisted after each subscription.

pub mod adapters;
pub mod domain;
pub mod parser;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
