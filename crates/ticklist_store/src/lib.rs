//! # Ticklist Store
//!
//! Task store trait and implementations for Ticklist.
//!
//! The store owns the durable copy of the task collection. It assigns ids on
//! insert and keeps tasks in insertion order; clients only ever see it
//! through the task API.
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral servers
//! - [`FileStore`] - Append-only document log in a locked directory
//!
//! ## Example
//!
//! ```rust
//! use ticklist_protocol::NewTask;
//! use ticklist_store::{InMemoryStore, TaskStore};
//!
//! let store = InMemoryStore::new();
//! let task = store.insert(NewTask::new("buy milk")).unwrap();
//! assert!(!task.completed);
//! assert_eq!(store.list().unwrap(), vec![task]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod file;
mod memory;
mod record;
mod store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use record::{compute_crc32, LogRecord, LOG_MAGIC};
pub use store::TaskStore;
