//! Planning request interpretation: a natural-language request becomes a
//! batch of scheduled planning tasks.
//!
//! The [`services::PlanningRequestInterpreter`] builds a client context
//! block, prompts a language model, extracts ideas from whatever the model
//! answers and places them in the requested pipeline stage with due dates
//! derived from the request's hints.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
