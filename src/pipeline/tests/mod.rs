//! Unit tests for the pipeline module.

mod placement_tests;
