//! Client profiles, content history and the context block built from them.

use crate::pipeline::domain::ClientId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptive profile of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Client identifier.
    pub id: ClientId,
    /// Display name.
    pub name: String,
    /// Short description of the business.
    pub description: Option<String>,
    /// Brand voice and identity guidelines.
    pub identity_guide: Option<String>,
}

/// A title already present in the client's content library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLibraryEntry {
    /// Title.
    pub title: String,
    /// Content format, when known.
    pub format: Option<String>,
}

/// A saved reference the client wants to draw on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Title.
    pub title: String,
    /// Where the reference came from.
    pub source_url: Option<String>,
}

/// Engagement counters of a published piece.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    /// Likes.
    pub likes: u64,
    /// Comments.
    pub comments: u64,
    /// Shares.
    pub shares: u64,
    /// Saves.
    pub saves: u64,
    /// Accounts reached; informational, not part of the score.
    pub reach: u64,
}

impl EngagementMetrics {
    /// Sum of likes, comments, shares and saves.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.likes
            .saturating_add(self.comments)
            .saturating_add(self.shares)
            .saturating_add(self.saves)
    }
}

/// Performance of one previously published piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Title.
    pub title: String,
    /// Content format.
    pub format: Option<String>,
    /// Published caption.
    pub caption: Option<String>,
    /// Engagement counters.
    pub metrics: EngagementMetrics,
}

/// Formatted client context for inclusion in a model prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlock {
    client_name: String,
    text: String,
}

impl ContextBlock {
    /// Wraps formatted context text.
    #[must_use]
    pub fn new(client_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            text: text.into(),
        }
    }

    /// Returns the client's display name.
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Returns the formatted text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ContextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
