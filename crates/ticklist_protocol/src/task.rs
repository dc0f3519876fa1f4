//! The task entity and its request bodies.

use crate::error::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix carried by every client-side temporary id.
pub const TEMP_ID_PREFIX: &str = "local-";

/// Opaque identifier of a task.
///
/// Ids are compared by equality only. The store assigns UUID v4 strings;
/// clients use [`TaskId::temporary`] for optimistic entries until the
/// server-assigned id arrives.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a fresh random identifier, as assigned by the store.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a temporary identifier from a millisecond timestamp and a
    /// per-client sequence number.
    #[must_use]
    pub fn temporary(millis: u64, sequence: u64) -> Self {
        Self(format!("{TEMP_ID_PREFIX}{millis}-{sequence}"))
    }

    /// Returns true if this id was generated client-side.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_ID_PREFIX)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks the id is usable as a path segment.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.0.trim().is_empty() {
            return Err(ProtocolError::EmptyId);
        }
        Ok(())
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A task as stored and as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier.
    #[serde(alias = "_id")]
    pub id: TaskId,
    /// Human-readable text.
    pub text: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates an open task.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Returns a copy with the completion flag set.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Text of the new task.
    pub text: String,
}

impl NewTask {
    /// Creates a create-request body.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Rejects text that is empty after trimming.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.text.trim().is_empty() {
            return Err(ProtocolError::EmptyText);
        }
        Ok(())
    }
}

/// Body of an update request.
///
/// Clients send the full task representation; identifier fields in the body
/// are ignored in favour of the path. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    /// Replacement text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Replacement completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskUpdate {
    /// Builds an update carrying every field of `task`.
    pub fn from_task(task: &Task) -> Self {
        Self {
            text: Some(task.text.clone()),
            completed: Some(task.completed),
        }
    }

    /// Rejects a blank replacement text.
    pub fn validate(&self) -> ProtocolResult<()> {
        match &self.text {
            Some(text) if text.trim().is_empty() => Err(ProtocolError::EmptyText),
            _ => Ok(()),
        }
    }

    /// Applies the present fields to `task`.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(text) = &self.text {
            task.text.clone_from(text);
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// Acknowledgement returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    /// Id of the removed task.
    pub id: TaskId,
}

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error description.
    pub error: String,
}

impl ErrorBody {
    /// Creates an error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
