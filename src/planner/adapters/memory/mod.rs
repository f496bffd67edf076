//! In-memory adapters for planner tests and offline runs.

mod completion;
mod history;

pub use completion::ScriptedCompletionClient;
pub use history::InMemoryClientHistory;
