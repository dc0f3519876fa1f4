//! # Ticklist Server
//!
//! HTTP task API for Ticklist.
//!
//! This crate provides:
//! - The five task routes over a [`ticklist_store::TaskStore`]
//! - Permissive CORS and request tracing
//! - Mapping of store failures to HTTP status codes
//!
//! # Routes
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/` | 200 liveness banner |
//! | GET | `/api/todos` | 200 `[Task]` |
//! | POST | `/api/todos` | 201 `Task` |
//! | PUT | `/api/todos/{id}` | 200 `Task` |
//! | DELETE | `/api/todos/{id}` | 200 `{id}` |
//!
//! Errors carry a JSON body `{"error": "..."}`.
//!
//! ```rust,ignore
//! use ticklist_server::{ServerConfig, TaskServer};
//!
//! let server = TaskServer::new(ServerConfig::default().with_data_dir("data"))?;
//! server.serve().await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{router, AppState, BANNER};
pub use server::TaskServer;
