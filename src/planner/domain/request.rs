//! Planning requests as received and as validated.

use super::RequestValidationError;
use crate::pipeline::domain::{ClientId, UserId, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Raw planning request body.
///
/// Every field is optional on the wire; [`PlanningRequest::validate`] turns
/// it into a [`PlanningBrief`] or explains what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanningRequest {
    /// Client to plan for.
    pub client_id: Option<String>,
    /// Workspace receiving the tasks.
    pub workspace_id: Option<String>,
    /// User issuing the request.
    pub user_id: Option<String>,
    /// Number of ideas wanted.
    pub quantity: Option<i64>,
    /// Content format, used literally when present.
    pub format: Option<String>,
    /// Target stage key, e.g. `rascunho`.
    pub column: Option<String>,
    /// Theme to focus the ideas on.
    pub theme_hint: Option<String>,
    /// Scheduling period such as `2 semanas`.
    pub scheduling_hint: Option<String>,
    /// Explicit date such as `12/01/2026`.
    pub date_hint: Option<String>,
    /// The user's original message.
    pub raw_message: Option<String>,
}

/// Accepted quantity range and the default for absent quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    /// Quantity used when the request has none.
    pub default: usize,
    /// Largest accepted quantity.
    pub max: usize,
}

impl Default for QuantityBounds {
    fn default() -> Self {
        Self { default: 5, max: 30 }
    }
}

/// A validated planning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningBrief {
    client_id: ClientId,
    workspace_id: WorkspaceId,
    user_id: UserId,
    quantity: usize,
    format: Option<String>,
    column: Option<String>,
    theme: Option<String>,
    scheduling_hint: Option<String>,
    date_hint: Option<String>,
    raw_message: String,
}

impl PlanningRequest {
    /// Validates identifiers and quantity.
    ///
    /// Blank optional strings are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`RequestValidationError`] for missing or malformed
    /// identifiers and out-of-range quantities.
    pub fn validate(self, bounds: QuantityBounds) -> Result<PlanningBrief, RequestValidationError> {
        let client_id = required_id::<ClientId>("clientId", self.client_id.as_deref())?;
        let workspace_id = required_id::<WorkspaceId>("workspaceId", self.workspace_id.as_deref())?;
        let user_id = required_id::<UserId>("userId", self.user_id.as_deref())?;
        let quantity = match self.quantity {
            None => bounds.default,
            Some(requested) => usize::try_from(requested)
                .ok()
                .filter(|value| (1..=bounds.max).contains(value))
                .ok_or(RequestValidationError::QuantityOutOfRange {
                    quantity: requested,
                    min: 1,
                    max: bounds.max,
                })?,
        };

        Ok(PlanningBrief {
            client_id,
            workspace_id,
            user_id,
            quantity,
            format: non_blank(self.format),
            column: non_blank(self.column),
            theme: non_blank(self.theme_hint),
            scheduling_hint: non_blank(self.scheduling_hint),
            date_hint: non_blank(self.date_hint),
            raw_message: self.raw_message.unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn required_id<T>(field: &'static str, value: Option<&str>) -> Result<T, RequestValidationError>
where
    T: FromStr,
{
    let raw = value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or(RequestValidationError::MissingField(field))?;
    raw.parse::<T>()
        .map_err(|_| RequestValidationError::InvalidIdentifier {
            field,
            value: raw.to_owned(),
        })
}

impl PlanningBrief {
    /// Returns the client.
    #[must_use]
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the requesting user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the number of ideas to produce.
    #[must_use]
    pub const fn quantity(&self) -> usize {
        self.quantity
    }

    /// Returns the requested format as the caller wrote it.
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Returns the requested stage key.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Returns the theme hint.
    #[must_use]
    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// Returns the scheduling-period hint.
    #[must_use]
    pub fn scheduling_hint(&self) -> Option<&str> {
        self.scheduling_hint.as_deref()
    }

    /// Returns the explicit date hint.
    #[must_use]
    pub fn date_hint(&self) -> Option<&str> {
        self.date_hint.as_deref()
    }

    /// Returns the user's original message.
    #[must_use]
    pub fn raw_message(&self) -> &str {
        &self.raw_message
    }
}
