//! Builds the client context block that steers generation.

use crate::pipeline::domain::ClientId;
use crate::planner::{
    domain::{ClientProfile, ContentLibraryEntry, ContextBlock, PerformanceRecord, ReferenceEntry},
    ports::{ClientHistoryError, ClientHistoryRepository},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const ELLIPSIS: char = '…';
const NONE_LINE: &str = "- none";
const CAPTION_BUDGET: usize = 200;

/// Size limits for the context block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    /// Characters of the identity guide kept.
    pub identity_guide_budget: usize,
    /// Performance records listed.
    pub top_performers: usize,
    /// Content-library titles listed.
    pub library_sample: usize,
    /// Reference-library titles listed.
    pub reference_sample: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            identity_guide_budget: 1_500,
            top_performers: 5,
            library_sample: 10,
            reference_sample: 5,
        }
    }
}

/// Errors raised while building a context block.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The client does not exist.
    #[error("client not found: {0}")]
    ClientNotFound(ClientId),
    /// A history lookup failed.
    #[error(transparent)]
    History(#[from] ClientHistoryError),
}

/// Read-and-format step producing a [`ContextBlock`].
#[derive(Clone)]
pub struct PlanningContextBuilder<H>
where
    H: ClientHistoryRepository,
{
    history: Arc<H>,
    limits: ContextLimits,
}

impl<H> PlanningContextBuilder<H>
where
    H: ClientHistoryRepository,
{
    /// Creates a builder with the given limits.
    #[must_use]
    pub const fn new(history: Arc<H>, limits: ContextLimits) -> Self {
        Self { history, limits }
    }

    /// Builds the context block for `client_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::ClientNotFound`] for unknown clients and
    /// [`ContextError::History`] when a lookup fails.
    pub async fn build(&self, client_id: ClientId) -> Result<ContextBlock, ContextError> {
        let profile = self
            .history
            .find_profile(client_id)
            .await?
            .ok_or(ContextError::ClientNotFound(client_id))?;
        let performers = self
            .history
            .top_performance_records(client_id, self.limits.top_performers)
            .await?;
        let library = self
            .history
            .library_entries(client_id, self.limits.library_sample)
            .await?;
        let references = self
            .history
            .reference_entries(client_id, self.limits.reference_sample)
            .await?;

        debug!(
            %client_id,
            performers = performers.len(),
            library = library.len(),
            references = references.len(),
            "built planning context"
        );
        let text = format_context(&profile, &performers, &library, &references, &self.limits);
        Ok(ContextBlock::new(profile.name, text))
    }
}

fn format_context(
    profile: &ClientProfile,
    performers: &[PerformanceRecord],
    library: &[ContentLibraryEntry],
    references: &[ReferenceEntry],
    limits: &ContextLimits,
) -> String {
    let mut lines = vec!["## Client identity".to_owned(), format!("Name: {}", profile.name)];
    if let Some(description) = non_blank(profile.description.as_deref()) {
        lines.push(format!("Description: {description}"));
    }
    if let Some(guide) = non_blank(profile.identity_guide.as_deref()) {
        lines.push(format!(
            "Identity guide: {}",
            truncate_chars(guide, limits.identity_guide_budget)
        ));
    }

    lines.push(String::new());
    lines.push("## Top-performing content".to_owned());
    if performers.is_empty() {
        lines.push(NONE_LINE.to_owned());
    }
    for (rank, record) in performers.iter().enumerate() {
        let mut line = format!(
            "{}. {} [{}] score {}",
            rank.saturating_add(1),
            record.title,
            non_blank(record.format.as_deref()).unwrap_or("unknown format"),
            record.metrics.score()
        );
        if let Some(caption) = non_blank(record.caption.as_deref()) {
            line.push_str(": ");
            line.push_str(&truncate_chars(caption, CAPTION_BUDGET));
        }
        lines.push(line);
    }

    lines.push(String::new());
    lines.push("## Existing library".to_owned());
    lines.push("Content library:".to_owned());
    if library.is_empty() {
        lines.push(NONE_LINE.to_owned());
    }
    lines.extend(library.iter().map(|entry| {
        non_blank(entry.format.as_deref()).map_or_else(
            || format!("- {}", entry.title),
            |format| format!("- {} ({format})", entry.title),
        )
    }));
    lines.push("References:".to_owned());
    if references.is_empty() {
        lines.push(NONE_LINE.to_owned());
    }
    lines.extend(references.iter().map(|entry| format!("- {}", entry.title)));
    lines.join("\n")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

/// Keeps at most `budget` characters, marking truncation with an ellipsis.
fn truncate_chars(text: &str, budget: usize) -> String {
    let mut characters = text.chars();
    let mut kept: String = characters.by_ref().take(budget).collect();
    if characters.next().is_some() {
        kept.push(ELLIPSIS);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::truncate_chars;
    use rstest::rstest;

    #[rstest]
    #[case("short", 10, "short")]
    #[case("exactly", 7, "exactly")]
    #[case("truncated", 5, "trunc…")]
    #[case("ação rápida", 4, "ação…")]
    fn truncates_on_char_boundaries(#[case] text: &str, #[case] budget: usize, #[case] expected: &str) {
        assert_eq!(truncate_chars(text, budget), expected);
    }
}
