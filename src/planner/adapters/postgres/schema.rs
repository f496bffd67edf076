//! Diesel schema for client profiles and history.

diesel::table! {
    /// Client profiles.
    clients (id) {
        /// Client identifier.
        id -> Uuid,
        /// Owning workspace.
        workspace_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Business description.
        description -> Nullable<Text>,
        /// Brand identity guidelines.
        identity_guide -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Existing content pieces.
    content_library (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Owning client.
        client_id -> Uuid,
        /// Title.
        title -> Text,
        /// Content format.
        #[max_length = 50]
        format -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Saved references.
    reference_library (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Owning client.
        client_id -> Uuid,
        /// Title.
        title -> Text,
        /// Source URL.
        source_url -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Engagement of published pieces.
    content_performance (id) {
        /// Record identifier.
        id -> Uuid,
        /// Owning client.
        client_id -> Uuid,
        /// Title.
        title -> Text,
        /// Content format.
        #[max_length = 50]
        format -> Nullable<Varchar>,
        /// Published caption.
        caption -> Nullable<Text>,
        /// Likes.
        likes -> Int8,
        /// Comments.
        comments -> Int8,
        /// Shares.
        shares -> Int8,
        /// Saves.
        saves -> Int8,
        /// Reach.
        reach -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    clients,
    content_library,
    reference_library,
    content_performance,
);
