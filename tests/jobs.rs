//! In-memory integration tests driving both jobs through their entry
//! points.

mod jobs {
    pub mod helpers;

    mod shared_stage_tests;
}
