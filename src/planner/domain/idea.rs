//! Content ideas produced by the language model.

use super::DEFAULT_FORMAT;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One generated content idea.
///
/// Text fields accept `null` (read as empty) and scalars (read as their
/// JSON text), since models do not always honour the requested shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentIdea {
    /// Headline.
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    /// What the piece covers.
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    /// Content format, e.g. `carousel`.
    #[serde(deserialize_with = "lenient_text")]
    pub format: String,
    /// What the piece should achieve.
    #[serde(deserialize_with = "lenient_text")]
    pub objective: String,
    /// Opening line that grabs attention.
    #[serde(deserialize_with = "lenient_text")]
    pub hook: String,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl ContentIdea {
    /// Returns the task description: the idea description followed by its
    /// objective and hook.
    #[must_use]
    pub fn task_description(&self) -> String {
        format!(
            "{}\n\nObjective: {}\nHook: {}",
            self.description.trim(),
            self.objective.trim(),
            self.hook.trim()
        )
    }

    /// Fills a blank format with `fallback`, else [`DEFAULT_FORMAT`].
    ///
    /// Formats keep their spelling; only surrounding whitespace is removed.
    #[must_use]
    pub fn with_format_fallback(mut self, fallback: Option<&str>) -> Self {
        let trimmed = self.format.trim();
        self.format = if trimmed.is_empty() {
            fallback.unwrap_or(DEFAULT_FORMAT).to_owned()
        } else {
            trimmed.to_owned()
        };
        self
    }
}

/// Synthesises `quantity` generic ideas for when the model output is
/// unusable.
#[must_use]
pub fn placeholder_ideas(quantity: usize, format: Option<&str>, theme: Option<&str>) -> Vec<ContentIdea> {
    let chosen_format = format.unwrap_or(DEFAULT_FORMAT);
    (1..=quantity)
        .map(|number| {
            let title = theme.map_or_else(
                || format!("{chosen_format} idea #{number}"),
                |subject| format!("{subject}: {chosen_format} idea #{number}"),
            );
            ContentIdea {
                title,
                description: format!(
                    "Outline a {chosen_format} for this client and refine it before drafting."
                ),
                format: chosen_format.to_owned(),
                objective: "Engage the audience".to_owned(),
                hook: "Open with a question your audience is asking.".to_owned(),
            }
        })
        .collect()
}
