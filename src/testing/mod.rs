//! Shared conformance suite for datastore backends.
//!
//! Every backend should pass the same behavioural checks. Implement
//! [`DatastoreTester`] to hand the suite fresh, empty instances and call
//! [`test_all`]:
//!
//! ```rust
//! use inferadb_tuple::datastore::{Datastore, InMemoryDatastore};
//! use inferadb_tuple::testing::{self, DatastoreTester};
//! use inferadb_tuple::Result;
//! use std::time::Duration;
//!
//! struct MemoryTester;
//!
//! impl DatastoreTester for MemoryTester {
//!     fn new(&self, revision_fuzzing_window: Duration) -> Result<Box<dyn Datastore>> {
//!         Ok(Box::new(InMemoryDatastore::with_fuzzing_window(revision_fuzzing_window)?))
//!     }
//! }
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
//! # rt.block_on(async {
//! testing::test_all(&MemoryTester).await.unwrap();
//! # });
//! ```
//!
//! A failed check returns an [`ErrorKind::Internal`](crate::ErrorKind::Internal)
//! error naming the check, or the backend's own error when an operation that
//! should succeed does not.

mod conformance;

pub use conformance::{
    DatastoreTester, check_consistency_tokens, check_create_conflict, check_delete_relationships,
    check_invalid_revision, check_preconditions, check_revision_fuzzing, check_revision_ordering,
    check_simple, check_watch, test_all,
};
