//! Error types for store operations.

use std::io;
use thiserror::Error;
use ticklist_protocol::{ProtocolError, TaskId};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record payload could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),

    /// The log file is corrupted.
    #[error("log corrupted: {0}")]
    Corrupted(String),

    /// Another process holds the store directory.
    #[error("store directory is locked by another process")]
    Locked,

    /// No task with the given id exists.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task or update failed validation.
    #[error("invalid task: {0}")]
    InvalidTask(#[from] ProtocolError),
}

impl StoreError {
    /// Creates a corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }

    /// Returns true if the error was caused by the caller's input rather
    /// than by the store itself.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::InvalidTask(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(StoreError::NotFound(TaskId::new("x")).is_caller_error());
        assert!(StoreError::InvalidTask(ProtocolError::EmptyText).is_caller_error());
        assert!(!StoreError::Locked.is_caller_error());
        assert!(!StoreError::corrupted("bad crc").is_caller_error());
    }

    #[test]
    fn error_display() {
        let err = StoreError::NotFound(TaskId::new("42"));
        assert_eq!(err.to_string(), "task not found: 42");
    }
}
