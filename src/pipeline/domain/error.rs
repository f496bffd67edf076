//! Error types for pipeline domain validation and parsing.

use super::{PlanningTaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating pipeline values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The stage name is empty after trimming.
    #[error("stage name must not be empty")]
    EmptyStageName,

    /// Positions start at zero.
    #[error("invalid position {0}, expected a non-negative integer")]
    NegativePosition(i32),

    /// The requested status change is not allowed by the state machine.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Task being transitioned.
        task_id: PlanningTaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The stage belongs to another workspace.
    #[error("stage belongs to a different workspace than task {0}")]
    ForeignStage(PlanningTaskId),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
