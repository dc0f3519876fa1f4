//! # Ticklist Sync Engine
//!
//! Optimistic client-side task synchronization for Ticklist.
//!
//! This crate provides:
//! - The [`SyncEngine`], owner of the client's view of the task list
//! - The [`TaskApi`] transport seam, with an HTTP implementation and a
//!   scripted mock
//! - Pure view-state transitions in [`view`]
//!
//! ## Protocol
//!
//! Every mutation runs as `applied locally → confirmed | rolled back`:
//! 1. Capture the value needed to undo the mutation
//! 2. Apply it to the view immediately, marking the task pending
//! 3. Issue the matching request
//! 4. Reconcile with the server's answer, or restore the captured value
//!    and show a short-lived error notice
//!
//! ## Key Invariants
//!
//! - Exactly one entry per task id in the view
//! - A temporary id is replaced by the server id in the same update, or the
//!   entry disappears; it is never left behind
//! - Failures never propagate past the operation; they become a rollback
//!   plus a notice that clears itself
//! - Operations are not serialized against each other. Keeping a second
//!   mutation off a pending task is the presentation layer's job.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod engine;
mod error;
mod http;
mod temp_id;
mod transport;
pub mod view;

pub use config::{EngineConfig, ErrorMessages};
pub use engine::{EngineStats, Outcome, SyncEngine};
pub use error::{SyncError, SyncResult};
pub use http::HttpTransport;
pub use temp_id::TempIdGenerator;
pub use transport::{ApiCall, MockTaskApi, TaskApi};
pub use view::{TaskView, ViewState};
