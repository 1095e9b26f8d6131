//! Integration tests for the downloader
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! fetcher and the full per-id download cycle end-to-end.

mod common;
mod fetch_tests;
