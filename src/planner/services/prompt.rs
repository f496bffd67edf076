//! System prompt rendering for planning requests.

use crate::planner::domain::{ContextBlock, PlanningBrief};
use minijinja::Environment;
use serde_json::{Map, Value};
use thiserror::Error;

const SYSTEM_PROMPT: &str = r#"You are a content strategist planning social media content for {{ client_name }}.

{{ context }}

Produce exactly {{ quantity }} content ideas.
Format: {% if format %}use "{{ format }}" for every idea{% else %}vary formats across the ideas{% endif %}.
Theme: {% if theme %}{{ theme }}{% else %}free, based on the client profile{% endif %}.
Do not repeat titles that already exist in the client's library.

Reply with JSON only, in exactly this shape:
{"ideas": [{"title": "...", "description": "...", "format": "...", "objective": "...", "hook": "..."}]}"#;

/// Raised when the prompt template fails to render.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render planning prompt: {0}")]
pub struct PromptError(pub String);

/// Renders the system prompt for `brief` around `context`.
///
/// # Errors
///
/// Returns [`PromptError`] when template rendering fails.
pub fn render_system_prompt(
    context: &ContextBlock,
    brief: &PlanningBrief,
) -> Result<String, PromptError> {
    let mut values = Map::new();
    values.insert(
        "client_name".to_owned(),
        Value::String(context.client_name().to_owned()),
    );
    values.insert("context".to_owned(), Value::String(context.as_str().to_owned()));
    values.insert("quantity".to_owned(), Value::from(brief.quantity()));
    values.insert("format".to_owned(), optional(brief.format()));
    values.insert("theme".to_owned(), optional(brief.theme()));

    Environment::new()
        .render_str(SYSTEM_PROMPT, values)
        .map_err(|error| PromptError(error.to_string()))
}

fn optional(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::String(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::render_system_prompt;
    use crate::planner::domain::{ContextBlock, PlanningRequest, QuantityBounds};
    use rstest::rstest;

    fn brief(format: Option<&str>, theme: Option<&str>) -> crate::planner::domain::PlanningBrief {
        PlanningRequest {
            client_id: Some("7b0e8c5e-3c7e-4d8e-9f7a-0e6b8f1d2c3a".to_owned()),
            workspace_id: Some("1f2e3d4c-5b6a-4789-8a7b-6c5d4e3f2a1b".to_owned()),
            user_id: Some("0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d".to_owned()),
            quantity: Some(4),
            format: format.map(str::to_owned),
            theme_hint: theme.map(str::to_owned),
            ..PlanningRequest::default()
        }
        .validate(QuantityBounds::default())
        .expect("valid request")
    }

    #[rstest]
    fn renders_context_and_directives() {
        let context = ContextBlock::new("Acme", "## Client identity\nName: Acme");

        let prompt =
            render_system_prompt(&context, &brief(Some("Carousel"), Some("launch week")))
                .expect("prompt renders");

        assert!(prompt.contains("for Acme."));
        assert!(prompt.contains("## Client identity\nName: Acme"));
        assert!(prompt.contains("Produce exactly 4 content ideas."));
        assert!(prompt.contains("use \"Carousel\" for every idea"));
        assert!(prompt.contains("Theme: launch week."));
        assert!(prompt.contains(r#"{"ideas": [{"title""#));
    }

    #[rstest]
    fn falls_back_to_open_directives() {
        let context = ContextBlock::new("Acme", "ctx");

        let prompt = render_system_prompt(&context, &brief(None, None)).expect("prompt renders");

        assert!(prompt.contains("vary formats across the ideas"));
        assert!(prompt.contains("free, based on the client profile"));
    }
}
