//! CLI command implementations.

pub mod serve;
pub mod tasks;

use thiserror::Error;
use ticklist_protocol::TaskId;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported by CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// The server could not be started.
    #[error(transparent)]
    Server(#[from] ticklist_server::ServerError),

    /// No task with this id exists on the server.
    #[error("no task with id {0}")]
    UnknownTask(TaskId),

    /// The server did not accept the operation.
    #[error("{0}")]
    Rejected(String),

    /// Output could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unsupported output format.
    #[error("unknown format '{0}' (expected text or json)")]
    UnknownFormat(String),
}
