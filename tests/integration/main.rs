//! Integration tests for inferadb-tuple.
//!
//! # Running Tests
//!
//! ```bash
//! # Run every integration test
//! cargo test --test integration
//!
//! # Run with backend tracing output
//! RUST_LOG=debug cargo test --features tracing --test integration -- --nocapture
//! ```

mod common;
mod conformance_tests;
mod property_tests;
