//! Normalised feed items extracted from a polled document.

use serde::{Deserialize, Serialize};

/// One item of a feed document.
///
/// Items are never persisted; they are turned into planning tasks and
/// remembered by `guid` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    title: String,
    link: String,
    description: String,
    pub_date: String,
    guid: String,
}

impl FeedItem {
    /// Builds an item, deriving its guid.
    ///
    /// The guid is the explicit guid, else the link, else the title; the
    /// first non-empty value wins. Returns `None` when all three are empty.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
        pub_date: impl Into<String>,
        explicit_guid: impl Into<String>,
    ) -> Option<Self> {
        let title_text = title.into();
        let link_text = link.into();
        let explicit = explicit_guid.into();
        let guid = [&explicit, &link_text, &title_text]
            .into_iter()
            .find(|candidate| !candidate.is_empty())?
            .clone();

        Some(Self {
            title: title_text,
            link: link_text,
            description: description.into(),
            pub_date: pub_date.into(),
            guid,
        })
    }

    /// Returns the item title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the canonical link.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the publish date exactly as the feed wrote it.
    #[must_use]
    pub fn pub_date(&self) -> &str {
        &self.pub_date
    }

    /// Returns the dedup identifier.
    #[must_use]
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Returns the best human label: title, else link, else guid.
    #[must_use]
    pub fn display_title(&self) -> &str {
        [&self.title, &self.link]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(&self.guid)
    }
}
