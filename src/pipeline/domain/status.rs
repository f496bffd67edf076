//! Task lifecycle status and priority.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a planning task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Raw idea, nothing written yet.
    Idea,
    /// Content is being written.
    Draft,
    /// Content awaits review.
    Review,
    /// Content has been approved.
    Approved,
    /// Content has a publication slot.
    Scheduled,
    /// Content is being pushed to the platform.
    Publishing,
    /// Content is live.
    Published,
    /// Generation or publication failed.
    Failed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Approved => "approved",
            Self::Scheduled => "scheduled",
            Self::Publishing => "publishing",
            Self::Published => "published",
            Self::Failed => "failed",
        }
    }

    /// Maps a stage `column_type` tag to the status tasks carry in it.
    ///
    /// Unknown tags map to [`TaskStatus::Idea`], the status every new task
    /// starts from.
    #[must_use]
    pub fn from_column_type(column_type: &str) -> Self {
        Self::try_from(column_type).unwrap_or(Self::Idea)
    }

    /// Returns `true` for statuses a task can be dragged between freely on
    /// the board.
    #[must_use]
    pub const fn is_editorial(self) -> bool {
        matches!(
            self,
            Self::Idea | Self::Draft | Self::Review | Self::Approved | Self::Scheduled
        )
    }

    /// Returns `true` when the state machine allows moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        if self.is_editorial() && target.is_editorial() {
            return true;
        }
        matches!(
            (self, target),
            (Self::Scheduled, Self::Publishing)
                | (Self::Publishing, Self::Published)
                | (
                    Self::Idea
                        | Self::Draft
                        | Self::Review
                        | Self::Approved
                        | Self::Scheduled
                        | Self::Publishing,
                    Self::Failed
                )
                | (Self::Failed, Self::Draft | Self::Scheduled)
        )
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "idea" => Ok(Self::Idea),
            "draft" => Ok(Self::Draft),
            "review" => Ok(Self::Review),
            "approved" => Ok(Self::Approved),
            "scheduled" => Ok(Self::Scheduled),
            "publishing" => Ok(Self::Publishing),
            "published" => Ok(Self::Published),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// Should be handled soon.
    High,
    /// Blocks a publication slot.
    Urgent,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Parses a stored priority, falling back to [`TaskPriority::Medium`].
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Medium,
        }
    }
}
