//! Common test harness for inferadb-tuple integration tests.

use std::sync::Once;
use std::time::Duration;

use inferadb_tuple::testing::DatastoreTester;
use inferadb_tuple::{Datastore, DatastoreConfig, InMemoryDatastore, Result};

static TRACING: Once = Once::new();

/// Installs a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builds in-memory datastores for the conformance suite.
pub struct MemoryTester {
    /// Watch buffer handed to every datastore.
    pub watch_buffer_length: usize,
}

impl Default for MemoryTester {
    fn default() -> Self {
        Self {
            watch_buffer_length: DatastoreConfig::default().watch_buffer_length,
        }
    }
}

impl DatastoreTester for MemoryTester {
    fn new(&self, revision_fuzzing_window: Duration) -> Result<Box<dyn Datastore>> {
        let config = DatastoreConfig::builder()
            .revision_fuzzing_window(revision_fuzzing_window)
            .watch_buffer_length(self.watch_buffer_length)
            .build();
        Ok(Box::new(InMemoryDatastore::new(config)?))
    }
}
