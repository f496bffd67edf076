//! Identifier types for pipeline records and the tenants that own them.

use crate::identifier::uuid_identifier;

uuid_identifier!(
    /// Unique identifier for a planning task.
    PlanningTaskId
);

uuid_identifier!(
    /// Unique identifier for a pipeline stage.
    StageId
);

uuid_identifier!(
    /// Identifier of the workspace (tenant) owning stages, tasks and feeds.
    WorkspaceId
);

uuid_identifier!(
    /// Identifier of the client profile a task or feed is about.
    ClientId
);

uuid_identifier!(
    /// Identifier of a workspace member.
    UserId
);
