//! Store configuration.

/// Configuration for opening a [`crate::FileStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether to create the store directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to fsync the log after every write (safer but slower).
    pub sync_on_write: bool,

    /// Number of dead records tolerated before the log is rewritten.
    ///
    /// Compaction also requires dead records to outnumber live tasks.
    pub compact_threshold: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            sync_on_write: true,
            compact_threshold: 1024,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to fsync after every write.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Sets the dead-record compaction threshold.
    #[must_use]
    pub const fn compact_threshold(mut self, records: usize) -> Self {
        self.compact_threshold = records;
        self
    }
}
