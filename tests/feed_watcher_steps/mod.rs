//! Step definitions for feed watcher scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
