//! Error types for the task protocol.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while building or decoding wire values.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Task text is empty after trimming.
    #[error("task text must not be empty")]
    EmptyText,

    /// Task identifier is empty.
    #[error("task id must not be empty")]
    EmptyId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ProtocolError::EmptyText.to_string(),
            "task text must not be empty"
        );
        assert_eq!(ProtocolError::EmptyId.to_string(), "task id must not be empty");
    }
}
