//! # Ticklist Protocol
//!
//! Task wire types for Ticklist.
//!
//! This crate provides:
//! - [`Task`] and [`TaskId`], the single entity shared by store, server and client
//! - Request bodies ([`NewTask`], [`TaskUpdate`]) and acknowledgements
//! - Route constants for the task API
//!
//! This is a pure protocol crate with no I/O operations.
//!
//! ## Wire format
//!
//! ```text
//! GET    /api/todos        -> [Task]
//! POST   /api/todos        {text} -> Task
//! PUT    /api/todos/{id}   {id, text, completed} -> Task
//! DELETE /api/todos/{id}   -> {id}
//! ```
//!
//! A task travels as `{"id": "...", "text": "...", "completed": false}`.
//! Decoders also accept `_id` in place of `id`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod routes;
mod task;

pub use error::{ProtocolError, ProtocolResult};
pub use routes::{task_path, TASKS_PATH};
pub use task::{DeleteAck, ErrorBody, NewTask, Task, TaskId, TaskUpdate, TEMP_ID_PREFIX};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_list_from_json() {
        let body = br#"[
            {"id": "a", "text": "one", "completed": false},
            {"_id": "b", "text": "two", "completed": true}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_slice(body).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].id, TaskId::new("b"));
        assert!(tasks[1].completed);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(serde_json::from_slice::<Task>(b"{ not json }").is_err());
    }
}
