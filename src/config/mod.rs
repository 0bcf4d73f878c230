//! Configuration types.
//!
//! - [`DatastoreConfig`]: revision fuzzing, garbage collection and watch buffering

mod datastore;

pub use datastore::DatastoreConfig;
