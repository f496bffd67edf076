//! Adapter implementations for feed watcher ports.

pub mod http;
pub mod memory;
pub mod postgres;
