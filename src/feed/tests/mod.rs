//! Unit tests for the feed module.
