//! Contentplan: content-planning jobs for a multi-tenant social media
//! backend.
//!
//! Two stateless jobs share one pipeline model:
//!
//! - the **feed watcher** ([`feed`]) polls RSS subscriptions and turns
//!   unseen items into planning tasks, optionally dispatching content
//!   generation for each;
//! - the **planning request interpreter** ([`planner`]) turns a structured
//!   natural-language request into a batch of scheduled planning tasks
//!   with the help of a language model.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: pure business logic with no infrastructure dependencies
//! - **Ports**: abstract trait interfaces for external interactions
//! - **Adapters**: in-memory, HTTP and `PostgreSQL` implementations
//! - **Services**: orchestration over ports, receiving every collaborator
//!   by constructor injection
//!
//! # Modules
//!
//! - [`pipeline`]: planning tasks, pipeline stages and task placement
//! - [`feed`]: feed subscriptions, the RSS parser and the feed watcher
//! - [`planner`]: planning requests and the interpreter
//! - [`api`]: JSON envelopes for both entry points
//! - [`config`]: YAML configuration with environment overrides
//! - [`telemetry`]: log subscriber setup

pub mod api;
pub mod config;
pub mod feed;
pub(crate) mod identifier;
pub mod pipeline;
pub mod planner;
pub mod postgres;
pub mod telemetry;

#[cfg(test)]
mod test_support;
