//! Error types for the sync engine.

use thiserror::Error;

/// Result type for task API calls.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while talking to the task API.
///
/// The engine does not distinguish between them: any of these is "request
/// failed" and triggers a rollback. The variants exist for logging.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Network or connection failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The API is unreachable.
    #[error("server is offline")]
    Offline,
}

impl SyncError {
    /// Returns true if the server rejected the request itself (4xx).
    pub fn is_rejection(&self) -> bool {
        matches!(self, SyncError::Status { status } if (400..500).contains(status))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            SyncError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            SyncError::Status {
                status: status.as_u16(),
            }
        } else {
            SyncError::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_classification() {
        assert!(SyncError::Status { status: 404 }.is_rejection());
        assert!(!SyncError::Status { status: 500 }.is_rejection());
        assert!(!SyncError::Offline.is_rejection());
        assert!(!SyncError::Transport("refused".into()).is_rejection());
    }

    #[test]
    fn error_display() {
        assert_eq!(SyncError::Offline.to_string(), "server is offline");
        assert_eq!(
            SyncError::Status { status: 503 }.to_string(),
            "server responded with status 503"
        );
    }
}
