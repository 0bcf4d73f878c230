//! Datastore configuration.

use std::time::Duration;

use crate::Error;

/// Configuration shared by datastore backends.
///
/// ## Revision Fuzzing
///
/// `revision_fuzzing_window` bounds how stale a `MinimizeLatency` read may be.
/// A wider window lets a backend serve more reads from already-cached
/// snapshots; zero always reads at the head revision.
///
/// ## Example
///
/// ```rust
/// use inferadb_tuple::DatastoreConfig;
/// use std::time::Duration;
///
/// let config = DatastoreConfig::builder()
///     .revision_fuzzing_window(Duration::from_millis(500))
///     .watch_buffer_length(1024)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct DatastoreConfig {
    /// Staleness tolerated when picking an optimized read revision.
    #[builder(default = Duration::from_secs(5))]
    pub revision_fuzzing_window: Duration,

    /// How long superseded revisions remain readable.
    #[builder(default = Duration::from_secs(24 * 60 * 60))]
    pub gc_window: Duration,

    /// Number of change batches buffered per watcher before it is dropped.
    #[builder(default = 128)]
    pub watch_buffer_length: usize,
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DatastoreConfig {
    /// Creates a default configuration with the given fuzzing window.
    pub fn with_fuzzing_window(revision_fuzzing_window: Duration) -> Self {
        Self::builder()
            .revision_fuzzing_window(revision_fuzzing_window)
            .build()
    }

    /// Checks the configuration for values no backend can honour.
    pub fn validate(&self) -> Result<(), Error> {
        if self.watch_buffer_length == 0 {
            return Err(Error::configuration("watch buffer length must be positive"));
        }
        if self.gc_window < self.revision_fuzzing_window {
            return Err(Error::configuration(format!(
                "gc window ({:?}) must not be shorter than the revision fuzzing window ({:?})",
                self.gc_window, self.revision_fuzzing_window
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = DatastoreConfig::default();
        assert_eq!(config.revision_fuzzing_window, Duration::from_secs(5));
        assert_eq!(config.gc_window, Duration::from_secs(86_400));
        assert_eq!(config.watch_buffer_length, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_fuzzing_window() {
        let config = DatastoreConfig::with_fuzzing_window(Duration::ZERO);
        assert_eq!(config.revision_fuzzing_window, Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_watch_buffer_rejected() {
        let config = DatastoreConfig::builder().watch_buffer_length(0).build();
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_gc_window_shorter_than_fuzzing_rejected() {
        let config = DatastoreConfig::builder()
            .revision_fuzzing_window(Duration::from_secs(10))
            .gc_window(Duration::from_secs(1))
            .build();
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Configuration);
    }
}
