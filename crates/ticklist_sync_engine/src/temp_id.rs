//! Temporary ids for optimistic creates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use ticklist_protocol::TaskId;

/// Generates client-side placeholder ids.
///
/// Ids combine the wall clock in milliseconds with a per-generator
/// sequence, so two ids from one generator never repeat even within the
/// same millisecond.
#[derive(Debug, Default)]
pub struct TempIdGenerator {
    sequence: AtomicU64,
}

impl TempIdGenerator {
    /// Creates a generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next temporary id.
    pub fn next(&self) -> TaskId {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        TaskId::temporary(millis, sequence)
    }

    /// Returns the next temporary id for which `taken` is false.
    pub fn next_unused(&self, mut taken: impl FnMut(&TaskId) -> bool) -> TaskId {
        loop {
            let id = self.next();
            if !taken(&id) {
                return id;
            }
        }
    }
}
