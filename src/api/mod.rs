//! JSON envelopes and status codes for the two job entry points.
//!
//! Callers get a [`JobResponse`]: an HTTP-style status code plus the JSON
//! body to return. The CLI prints the body and maps the status to its exit
//! code; an HTTP front end can forward both unchanged.

mod envelope;
mod handlers;

pub use envelope::{ErrorEnvelope, JobResponse, PlanEnvelope, WatchEnvelope};
pub use handlers::{plan, watch_feeds};
