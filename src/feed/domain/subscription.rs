//! Feed subscriptions and their append-only seen-sets.

use super::{FeedDomainError, PromptTemplate};
use crate::identifier::uuid_identifier;
use crate::pipeline::domain::{ClientId, StageId, WorkspaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

uuid_identifier!(
    /// Unique identifier for a feed subscription.
    SubscriptionId
);

/// Identifiers of feed items already turned into tasks.
///
/// Keeps first-seen order for storage and a hash index for lookups. The
/// type offers no removal operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SeenItems {
    ordered: Vec<String>,
    index: HashSet<String>,
}

impl SeenItems {
    /// Creates an empty seen-set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `guid` has been seen.
    #[must_use]
    pub fn contains(&self, guid: &str) -> bool {
        self.index.contains(guid)
    }

    /// Records `guid`, returning `true` when it was not yet present.
    pub fn insert(&mut self, guid: impl Into<String>) -> bool {
        let value = guid.into();
        if self.index.contains(&value) {
            return false;
        }
        self.index.insert(value.clone());
        self.ordered.push(value);
        true
    }

    /// Returns the number of recorded identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Iterates identifiers in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Returns `true` when every identifier of `other` is recorded here.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.index.is_subset(&self.index)
    }
}

impl<S: Into<String>> FromIterator<S> for SeenItems {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = Self::new();
        for guid in iter {
            seen.insert(guid);
        }
        seen
    }
}

impl From<Vec<String>> for SeenItems {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}

impl From<SeenItems> for Vec<String> {
    fn from(value: SeenItems) -> Self {
        value.ordered
    }
}

/// One monitored feed and its processing rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSubscription {
    id: SubscriptionId,
    workspace_id: WorkspaceId,
    client_id: Option<ClientId>,
    name: String,
    feed_url: String,
    is_active: bool,
    stage_id: Option<StageId>,
    platform: Option<String>,
    content_type: Option<String>,
    prompt_template: Option<PromptTemplate>,
    auto_generate_content: bool,
    last_checked_at: Option<DateTime<Utc>>,
    last_item_guid: Option<String>,
    items_seen: SeenItems,
}

/// Parameter object for reconstructing a persisted subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFeedSubscriptionData {
    /// Subscription identifier.
    pub id: SubscriptionId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Client the feed is about.
    pub client_id: Option<ClientId>,
    /// Display name.
    pub name: String,
    /// Feed URL.
    pub feed_url: String,
    /// Whether the watcher polls this feed.
    pub is_active: bool,
    /// Target stage for new tasks.
    pub stage_id: Option<StageId>,
    /// Platform tag copied onto new tasks.
    pub platform: Option<String>,
    /// Content-type tag copied onto new tasks.
    pub content_type: Option<String>,
    /// Prompt template for auto-generation.
    pub prompt_template: Option<String>,
    /// Whether new tasks trigger content generation.
    pub auto_generate_content: bool,
    /// Last poll timestamp.
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Guid of the newest item at the last poll.
    pub last_item_guid: Option<String>,
    /// Previously seen item identifiers.
    pub items_seen: Vec<String>,
}

impl FeedSubscription {
    /// Creates an active subscription with no processing options.
    ///
    /// # Errors
    ///
    /// Returns [`FeedDomainError::EmptyName`] for blank names and
    /// [`FeedDomainError::InvalidFeedUrl`] for non-http(s) URLs.
    pub fn new(
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        feed_url: impl Into<String>,
    ) -> Result<Self, FeedDomainError> {
        let raw_name = name.into();
        let trimmed_name = raw_name.trim();
        if trimmed_name.is_empty() {
            return Err(FeedDomainError::EmptyName);
        }
        let raw_url = feed_url.into();
        let url = raw_url.trim();
        let has_scheme = url.starts_with("http://") || url.starts_with("https://");
        if !has_scheme || url.chars().any(char::is_whitespace) {
            return Err(FeedDomainError::InvalidFeedUrl(raw_url));
        }

        Ok(Self {
            id: SubscriptionId::new(),
            workspace_id,
            client_id: None,
            name: trimmed_name.to_owned(),
            feed_url: url.to_owned(),
            is_active: true,
            stage_id: None,
            platform: None,
            content_type: None,
            prompt_template: None,
            auto_generate_content: false,
            last_checked_at: None,
            last_item_guid: None,
            items_seen: SeenItems::new(),
        })
    }

    /// Sets the client the feed is about.
    #[must_use]
    pub const fn with_client(mut self, client_id: Option<ClientId>) -> Self {
        self.client_id = client_id;
        self
    }

    /// Sets the target stage.
    #[must_use]
    pub const fn with_stage(mut self, stage_id: Option<StageId>) -> Self {
        self.stage_id = stage_id;
        self
    }

    /// Sets the platform and content-type tags.
    #[must_use]
    pub fn with_tags(mut self, platform: Option<String>, content_type: Option<String>) -> Self {
        self.platform = platform;
        self.content_type = content_type;
        self
    }

    /// Enables content generation with `template`.
    #[must_use]
    pub fn with_auto_generation(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = PromptTemplate::new(template);
        self.auto_generate_content = true;
        self
    }

    /// Seeds the seen-set.
    #[must_use]
    pub fn with_seen_items(mut self, seen: SeenItems) -> Self {
        self.items_seen = seen;
        self
    }

    /// Marks the subscription inactive.
    #[must_use]
    pub const fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Reconstructs a subscription from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedFeedSubscriptionData) -> Self {
        Self {
            id: data.id,
            workspace_id: data.workspace_id,
            client_id: data.client_id,
            name: data.name,
            feed_url: data.feed_url,
            is_active: data.is_active,
            stage_id: data.stage_id,
            platform: data.platform,
            content_type: data.content_type,
            prompt_template: data.prompt_template.and_then(PromptTemplate::new),
            auto_generate_content: data.auto_generate_content,
            last_checked_at: data.last_checked_at,
            last_item_guid: data.last_item_guid,
            items_seen: data.items_seen.into(),
        }
    }

    /// Returns the subscription identifier.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the client, if any.
    #[must_use]
    pub const fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the feed URL.
    #[must_use]
    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// Returns whether the watcher polls this feed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the configured target stage.
    #[must_use]
    pub const fn stage_id(&self) -> Option<StageId> {
        self.stage_id
    }

    /// Returns the platform tag.
    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Returns the content-type tag.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the prompt template.
    #[must_use]
    pub const fn prompt_template(&self) -> Option<&PromptTemplate> {
        self.prompt_template.as_ref()
    }

    /// Returns the template to render when auto-generation is enabled.
    #[must_use]
    pub const fn generation_template(&self) -> Option<&PromptTemplate> {
        if self.auto_generate_content {
            self.prompt_template.as_ref()
        } else {
            None
        }
    }

    /// Returns whether new tasks trigger content generation.
    #[must_use]
    pub const fn auto_generate_content(&self) -> bool {
        self.auto_generate_content
    }

    /// Returns the last poll timestamp.
    #[must_use]
    pub const fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        self.last_checked_at
    }

    /// Returns the guid of the newest item at the last poll.
    #[must_use]
    pub fn last_item_guid(&self) -> Option<&str> {
        self.last_item_guid.as_deref()
    }

    /// Returns the seen-set.
    #[must_use]
    pub const fn items_seen(&self) -> &SeenItems {
        &self.items_seen
    }

    /// Returns `true` when `guid` has already produced a task.
    #[must_use]
    pub fn has_seen(&self, guid: &str) -> bool {
        self.items_seen.contains(guid)
    }

    /// Adds `guid` to the seen-set.
    pub fn mark_seen(&mut self, guid: impl Into<String>) -> bool {
        self.items_seen.insert(guid)
    }

    /// Folds the watermark of a newer snapshot of this subscription into
    /// `self`.
    ///
    /// Seen identifiers are unioned, never replaced, so merging an older
    /// snapshot cannot drop anything.
    pub fn absorb_watermark(&mut self, newer: &Self) {
        for guid in newer.items_seen.iter() {
            self.items_seen.insert(guid);
        }
        if newer.last_checked_at.is_some() {
            self.last_checked_at = newer.last_checked_at;
        }
        if let Some(guid) = newer.last_item_guid.as_deref() {
            self.last_item_guid = Some(guid.to_owned());
        }
    }

    /// Advances the watermark after a poll.
    ///
    /// `newest_guid` is the first item of the fetched document; an empty
    /// document leaves the previous value in place.
    pub fn record_check(&mut self, newest_guid: Option<&str>, clock: &impl Clock) {
        self.last_checked_at = Some(clock.utc());
        if let Some(guid) = newest_guid {
            self.last_item_guid = Some(guid.to_owned());
        }
    }
}
