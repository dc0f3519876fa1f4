//! Request handlers for the task routes.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use std::sync::Arc;
use ticklist_protocol::{DeleteAck, NewTask, Task, TaskId, TaskUpdate, TASKS_PATH};
use ticklist_store::TaskStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Plain-text body of the liveness route.
pub const BANNER: &str = "ticklist server is running";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The task collection.
    pub store: Arc<dyn TaskStore>,
}

impl AppState {
    /// Creates handler state over a store.
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

/// Builds the task API router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let item_path = format!("{TASKS_PATH}/{{id}}");
    let router = Router::new()
        .route("/", get(banner))
        .route(TASKS_PATH, get(list_tasks).post(create_task))
        .route(&item_path, put(update_task).delete(delete_task))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn banner() -> &'static str {
    BANNER
}

async fn list_tasks(State(state): State<AppState>) -> ServerResult<Json<Vec<Task>>> {
    let tasks = state.store.list()?;
    tracing::debug!(count = tasks.len(), "listed tasks");
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Task>)> {
    let Json(new_task) = body?;
    let task = state.store.insert(new_task)?;
    tracing::debug!(id = %task.id, "created task");
    Ok((StatusCode::CREATED, Json(task)))
}

/// Reads a task id from a path segment.
fn path_id(raw: String) -> ServerResult<TaskId> {
    let id = TaskId::new(raw);
    id.validate()?;
    Ok(id)
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TaskUpdate>, JsonRejection>,
) -> ServerResult<Json<Task>> {
    let id = path_id(id)?;
    let Json(update) = body?;
    let task = state.store.update(&id, update)?;
    tracing::debug!(id = %task.id, completed = task.completed, "updated task");
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<DeleteAck>> {
    let removed = state.store.remove(&path_id(id)?)?;
    tracing::debug!(id = %removed.id, "deleted task");
    Ok(Json(DeleteAck { id: removed.id }))
}
