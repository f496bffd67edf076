//! Adapter implementations for planner ports.

pub mod memory;
pub mod openai;
pub mod postgres;
