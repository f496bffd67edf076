//! Application services shared by the planning jobs.

mod placement;

pub use placement::{PlacementError, PlacementResult, StageCursor, TaskPlacement};
