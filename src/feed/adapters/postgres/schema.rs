//! Diesel schema for feed subscriptions.

diesel::table! {
    /// Monitored RSS feeds.
    feed_subscriptions (id) {
        /// Subscription identifier.
        id -> Uuid,
        /// Owning workspace.
        workspace_id -> Uuid,
        /// Client the feed is about.
        client_id -> Nullable<Uuid>,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Feed URL.
        feed_url -> Text,
        /// Whether the watcher polls the feed.
        is_active -> Bool,
        /// Target stage for new tasks.
        stage_id -> Nullable<Uuid>,
        /// Platform tag.
        #[max_length = 50]
        platform -> Nullable<Varchar>,
        /// Content-type tag.
        #[max_length = 50]
        content_type -> Nullable<Varchar>,
        /// Prompt template for auto-generation.
        prompt_template -> Nullable<Text>,
        /// Whether new tasks trigger generation.
        auto_generate_content -> Bool,
        /// Last poll timestamp.
        last_checked_at -> Nullable<Timestamptz>,
        /// Guid of the newest item at the last poll.
        last_item_guid -> Nullable<Text>,
        /// Seen item identifiers as a JSON array.
        items_seen -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
