//! Unit tests for the planner module.

mod context_tests;
