//! Integration tests for Lead-Scout
//!
//! These tests use wiremock to stand in for both the AI service and the
//! websites it proposes, and exercise full runs end-to-end.

mod cache_tests;
mod common;
mod pipeline_tests;
