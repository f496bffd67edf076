//! Content pipeline: planning tasks and the stages they move through.
//!
//! Both planning jobs write into the pipeline through [`services::TaskPlacement`],
//! which owns stage fallback and position allocation. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
