//! Turns a planning request into a batch of scheduled planning tasks.

use super::{
    context::{ContextError, ContextLimits, PlanningContextBuilder},
    prompt::{PromptError, render_system_prompt},
};
use crate::pipeline::{
    domain::{
        ClientId, PipelineStage, PlanningTask, PlanningTaskDraft, PlanningTaskId, TaskMetadata,
        WorkspaceId, first_stage_by_position, stage_for_status,
    },
    ports::{PipelineStageRepository, PlanningTaskRepository},
    services::{PlacementError, TaskPlacement},
};
use crate::planner::{
    domain::{
        ContentIdea, PlanningBrief, PlanningRequest, QuantityBounds, RequestValidationError,
        parse_ideas, placeholder_ideas, platform_for_format, resolve_due_dates,
        status_for_stage_key,
    },
    ports::{
        ClientHistoryError, ClientHistoryRepository, CompletionClient, CompletionError,
        CompletionRequest,
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

const GENERATOR: &str = "smart-planner";

/// Tuning knobs for the interpreter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerSettings {
    /// Accepted quantity range.
    pub quantity: QuantityBounds,
    /// Sampling temperature sent to the model.
    pub temperature: f32,
    /// Context block limits.
    pub context: ContextLimits,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            quantity: QuantityBounds::default(),
            temperature: 0.8,
            context: ContextLimits::default(),
        }
    }
}

/// Failures of a planning request.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// The request was incomplete or malformed.
    #[error(transparent)]
    Validation(#[from] RequestValidationError),
    /// The client does not exist.
    #[error("client not found: {0}")]
    ClientNotFound(ClientId),
    /// The workspace has no pipeline stages to place tasks in.
    #[error("workspace {0} has no pipeline stages")]
    NoStages(WorkspaceId),
    /// The language model call failed.
    #[error("language model call failed: {0}")]
    Completion(#[from] CompletionError),
    /// The system prompt could not be rendered.
    #[error(transparent)]
    Prompt(#[from] PromptError),
    /// Client history could not be read.
    #[error(transparent)]
    History(#[from] ClientHistoryError),
    /// Stage lookup or position allocation failed.
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

impl From<ContextError> for PlanningError {
    fn from(error: ContextError) -> Self {
        match error {
            ContextError::ClientNotFound(client_id) => Self::ClientNotFound(client_id),
            ContextError::History(source) => Self::History(source),
        }
    }
}

impl PlanningError {
    /// Returns `true` when repeating the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Completion(_) | Self::History(_) | Self::Placement(_)
        )
    }

    /// Returns the HTTP status code reported for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::ClientNotFound(_) => 404,
            Self::NoStages(_) => 422,
            Self::Completion(_) => 502,
            Self::Prompt(_) | Self::History(_) | Self::Placement(_) => 500,
        }
    }
}

/// One task created by a planning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedCard {
    /// Created task.
    pub id: PlanningTaskId,
    /// Task title.
    pub title: String,
    /// Content format.
    pub format: String,
    /// Name of the stage the task landed in.
    pub column: String,
    /// Assigned due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Summary of a completed planning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningOutcome {
    /// Client planned for.
    pub client_name: String,
    /// Stage the tasks were placed in.
    pub stage_name: String,
    /// Requested format, if any.
    pub format: Option<String>,
    /// Tasks that were stored, in insertion order.
    pub cards: Vec<PlannedCard>,
    /// Every idea considered, including ones whose insert failed.
    pub ideas: Vec<ContentIdea>,
    /// Whether placeholder ideas replaced unusable model output.
    pub used_fallback: bool,
    /// Model that answered.
    pub model: String,
}

/// Planning request interpreter.
///
/// Runs `validate → context → prompt → model → parse → stage → dates →
/// insert`. Individual insert failures are logged and skipped; every other
/// failure aborts the request before anything is written.
pub struct PlanningRequestInterpreter<H, M, T, S, C>
where
    H: ClientHistoryRepository,
    M: CompletionClient,
    T: PlanningTaskRepository,
    S: PipelineStageRepository,
    C: Clock + Send + Sync,
{
    context: PlanningContextBuilder<H>,
    completion: Arc<M>,
    placement: TaskPlacement<T, S, C>,
    clock: Arc<C>,
    settings: PlannerSettings,
}

impl<H, M, T, S, C> PlanningRequestInterpreter<H, M, T, S, C>
where
    H: ClientHistoryRepository,
    M: CompletionClient,
    T: PlanningTaskRepository,
    S: PipelineStageRepository,
    C: Clock + Send + Sync,
{
    /// Creates an interpreter.
    #[must_use]
    pub const fn new(
        history: Arc<H>,
        completion: Arc<M>,
        placement: TaskPlacement<T, S, C>,
        clock: Arc<C>,
        settings: PlannerSettings,
    ) -> Self {
        Self {
            context: PlanningContextBuilder::new(history, settings.context),
            completion,
            placement,
            clock,
            settings,
        }
    }

    /// Interprets `request` and stores the resulting tasks.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError`] for invalid requests, unknown clients,
    /// model failures, workspaces without stages and data-store failures
    /// outside the per-task inserts.
    pub async fn interpret(&self, request: PlanningRequest) -> Result<PlanningOutcome, PlanningError> {
        let brief = request.validate(self.settings.quantity)?;
        let context = self.context.build(brief.client_id()).await?;
        let system_prompt = render_system_prompt(&context, &brief)?;
        let completion = self
            .completion
            .complete(&CompletionRequest {
                system_prompt,
                user_message: user_message(&brief),
                temperature: self.settings.temperature,
            })
            .await?;

        let (ideas, used_fallback) = select_ideas(&completion.text, &brief);
        if used_fallback {
            warn!(
                client_id = %brief.client_id(),
                model = %completion.model,
                "model output unusable, using placeholder ideas"
            );
        }

        let stage = self.resolve_stage(&brief).await?;
        let today = self.clock.utc().date_naive();
        let due_dates = resolve_due_dates(
            brief.quantity(),
            brief.date_hint(),
            brief.scheduling_hint(),
            today,
        );

        let mut cursor = self
            .placement
            .open_cursor(brief.workspace_id(), Some(stage.id()))
            .await?;
        let mut cards = Vec::with_capacity(ideas.len());
        for (idea, due_date) in ideas.iter().zip(due_dates) {
            let draft = task_draft(&brief, &stage, idea, due_date, &completion.model, used_fallback);
            match self.placement.place(&mut cursor, draft).await {
                Ok(task) => cards.push(planned_card(&task, idea, &stage)),
                Err(err) => warn!(
                    workspace_id = %brief.workspace_id(),
                    title = %idea.title,
                    error = %err,
                    "failed to store planned task, skipping"
                ),
            }
        }

        info!(
            client_id = %brief.client_id(),
            workspace_id = %brief.workspace_id(),
            stage = stage.name(),
            created = cards.len(),
            requested = brief.quantity(),
            used_fallback,
            "planning request completed"
        );
        Ok(PlanningOutcome {
            client_name: context.client_name().to_owned(),
            stage_name: stage.name().to_owned(),
            format: brief.format().map(str::to_owned),
            cards,
            ideas,
            used_fallback,
            model: completion.model,
        })
    }

    async fn resolve_stage(&self, brief: &PlanningBrief) -> Result<PipelineStage, PlanningError> {
        let stages = self.placement.stages(brief.workspace_id()).await?;
        let wanted = status_for_stage_key(brief.column());
        stage_for_status(&stages, wanted)
            .or_else(|| first_stage_by_position(&stages))
            .cloned()
            .ok_or(PlanningError::NoStages(brief.workspace_id()))
    }
}

fn user_message(brief: &PlanningBrief) -> String {
    let message = brief.raw_message().trim();
    if message.is_empty() {
        format!("Plan {} content ideas.", brief.quantity())
    } else {
        message.to_owned()
    }
}

/// Parses the model answer, falling back to placeholders, and trims the
/// result to the requested quantity.
fn select_ideas(text: &str, brief: &PlanningBrief) -> (Vec<ContentIdea>, bool) {
    let (mut ideas, used_fallback) = parse_ideas(text).map_or_else(
        || {
            (
                placeholder_ideas(brief.quantity(), brief.format(), brief.theme()),
                true,
            )
        },
        |parsed| (parsed, false),
    );
    ideas.truncate(brief.quantity());
    let completed = ideas
        .into_iter()
        .map(|idea| idea.with_format_fallback(brief.format()))
        .collect();
    (completed, used_fallback)
}

fn task_draft(
    brief: &PlanningBrief,
    stage: &PipelineStage,
    idea: &ContentIdea,
    due_date: Option<NaiveDate>,
    model: &str,
    used_fallback: bool,
) -> PlanningTaskDraft {
    let mut metadata = TaskMetadata::new();
    metadata.insert("generator".to_owned(), Value::from(GENERATOR));
    metadata.insert("model".to_owned(), Value::from(model));
    metadata.insert("request".to_owned(), Value::from(brief.raw_message()));
    metadata.insert("objective".to_owned(), Value::from(idea.objective.as_str()));
    metadata.insert("hook".to_owned(), Value::from(idea.hook.as_str()));
    metadata.insert("fallback".to_owned(), Value::Bool(used_fallback));

    PlanningTaskDraft::new(brief.workspace_id(), idea.title.trim(), stage.status())
        .with_client(Some(brief.client_id()))
        .with_description(idea.task_description())
        .with_platform(Some(platform_for_format(&idea.format).to_owned()))
        .with_content_type(Some(idea.format.clone()))
        .with_labels(brief.theme().map(str::to_owned))
        .with_due_date(due_date)
        .with_metadata(metadata)
        .with_creator(Some(brief.user_id()))
}

fn planned_card(task: &PlanningTask, idea: &ContentIdea, stage: &PipelineStage) -> PlannedCard {
    PlannedCard {
        id: task.id(),
        title: task.title().to_owned(),
        format: idea.format.clone(),
        column: stage.name().to_owned(),
        due_date: task.due_date(),
    }
}
