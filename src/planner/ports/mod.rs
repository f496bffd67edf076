//! Port contracts for the planning request interpreter.

pub mod completion;
pub mod history;

#[cfg(test)]
pub use completion::MockCompletionClient;
pub use completion::{Completion, CompletionClient, CompletionError, CompletionRequest};
pub use history::{ClientHistoryError, ClientHistoryRepository, ClientHistoryResult};
