//! Diesel schema for pipeline persistence.

diesel::table! {
    /// Workspace board columns.
    pipeline_stages (id) {
        /// Stage identifier.
        id -> Uuid,
        /// Owning workspace.
        workspace_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Board position.
        position -> Int4,
        /// Column type tag mapped to a task status.
        #[max_length = 50]
        column_type -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Planning tasks (board cards).
    planning_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning workspace.
        workspace_id -> Uuid,
        /// Client the task is about.
        client_id -> Nullable<Uuid>,
        /// Stage holding the task.
        stage_id -> Nullable<Uuid>,
        /// Title.
        title -> Text,
        /// Description.
        description -> Text,
        /// Generated content body.
        content -> Nullable<Text>,
        /// Platform tag.
        #[max_length = 50]
        platform -> Nullable<Varchar>,
        /// Content-type tag.
        #[max_length = 50]
        content_type -> Nullable<Varchar>,
        /// Due date.
        due_date -> Nullable<Date>,
        /// Scheduled publication timestamp.
        scheduled_at -> Nullable<Timestamptz>,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Position within the stage.
        position -> Int4,
        /// Labels.
        labels -> Array<Text>,
        /// Assignee.
        assignee_id -> Nullable<Uuid>,
        /// Media references.
        media -> Array<Text>,
        /// Provenance and free-form metadata.
        metadata -> Jsonb,
        /// Creator.
        created_by -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(pipeline_stages, planning_tasks);
