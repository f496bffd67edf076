//! Planning request orchestration.

mod context;
mod interpreter;
mod prompt;

pub use context::{ContextError, ContextLimits, PlanningContextBuilder};
pub use interpreter::{
    PlannedCard, PlannerSettings, PlanningError, PlanningOutcome, PlanningRequestInterpreter,
};
pub use prompt::{PromptError, render_system_prompt};
