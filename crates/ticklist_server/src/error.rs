//! Error types for the task server.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use ticklist_protocol::{ErrorBody, ProtocolError, TaskId};
use ticklist_store::StoreError;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the task server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid request body or parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No task with the given id.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The store failed.
    #[error("store error: {0}")]
    Store(StoreError),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::InvalidRequest(_) | ServerError::NotFound(_)
        )
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Store(_) | ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(error: StoreError) -> Self {
        if !error.is_caller_error() {
            return ServerError::Store(error);
        }
        match error {
            StoreError::NotFound(id) => ServerError::NotFound(id),
            StoreError::InvalidTask(e) => e.into(),
            other => ServerError::InvalidRequest(other.to_string()),
        }
    }
}

impl From<ProtocolError> for ServerError {
    fn from(error: ProtocolError) -> Self {
        ServerError::InvalidRequest(error.to_string())
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if self.is_server_error() {
            // Store internals stay in the log.
            tracing::error!(error = %self, "request failed");
            ErrorBody::new("internal server error")
        } else {
            tracing::debug!(error = %self, "request rejected");
            ErrorBody::new(self.to_string())
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(ServerError::InvalidRequest("bad".into()).is_client_error());
        assert!(ServerError::NotFound(TaskId::new("1")).is_client_error());
        assert!(ServerError::Store(StoreError::Locked).is_server_error());
        assert!(!ServerError::InvalidRequest("bad".into()).is_server_error());
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let not_found: ServerError = StoreError::NotFound(TaskId::new("7")).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid: ServerError = StoreError::InvalidTask(ProtocolError::EmptyText).into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let corrupt: ServerError = StoreError::corrupted("crc").into();
        assert_eq!(corrupt.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let locked: ServerError = StoreError::Locked.into();
        assert!(matches!(locked, ServerError::Store(StoreError::Locked)));

        let empty_id: ServerError = ProtocolError::EmptyId.into();
        assert_eq!(empty_id.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_details_are_not_echoed() {
        let response = ServerError::Store(StoreError::corrupted("secret path")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
