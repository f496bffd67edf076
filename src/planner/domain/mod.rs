//! Domain model for turning planning requests into task batches.
//!
//! Everything here is pure: request validation, the idea vocabulary,
//! lenient model-output extraction and the two date helpers. Services wire
//! these to the data store and the completion endpoint.

mod client;
mod date_hint;
mod error;
mod extract;
mod format;
mod idea;
mod request;
mod schedule;
mod stage_key;

pub use client::{
    ClientProfile, ContentLibraryEntry, ContextBlock, EngagementMetrics, PerformanceRecord,
    ReferenceEntry,
};
pub use date_hint::parse_date_hint;
pub use error::RequestValidationError;
pub use extract::{extract_json_candidates, parse_ideas};
pub use format::{DEFAULT_FORMAT, platform_for_format};
pub use idea::{ContentIdea, placeholder_ideas};
pub use request::{PlanningBrief, PlanningRequest, QuantityBounds};
pub use schedule::{distribute_due_dates, resolve_due_dates};
pub use stage_key::status_for_stage_key;
