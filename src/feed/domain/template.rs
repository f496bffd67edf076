//! Prompt templates attached to auto-generating subscriptions.

use super::FeedItem;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[expect(
    clippy::expect_used,
    reason = "pattern is a literal covered by the template tests"
)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(title|description|link|contentType)\}").expect("placeholder pattern must compile")
});

/// A prompt with `{title}`, `{description}`, `{link}` and `{contentType}`
/// placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    /// Wraps a template, returning `None` for blank templates.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Option<Self> {
        let raw = template.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    /// Returns the raw template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes every placeholder occurrence with the item's fields.
    ///
    /// Substitution is a single pass over the template, so placeholder text
    /// inside item fields is kept verbatim. A missing content type renders
    /// as an empty string.
    #[must_use]
    pub fn render(&self, item: &FeedItem, content_type: Option<&str>) -> String {
        PLACEHOLDER
            .replace_all(&self.0, |captures: &Captures<'_>| {
                let value = match captures.get(1).map_or("", |name| name.as_str()) {
                    "title" => item.title(),
                    "description" => item.description(),
                    "link" => item.link(),
                    _ => content_type.unwrap_or_default(),
                };
                value.to_owned()
            })
            .into_owned()
    }
}
