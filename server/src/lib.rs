//! HTTP/JSON adapter over a shared `TaskStore`.
//!
//! Every handler takes the store lock for one store call plus the read-back
//! of the view it returns, so a client never observes a half-applied change.
//! Mutations on unknown ids follow the store: they succeed as no-ops.

pub mod config;
pub mod error;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tasklist_core::{DisplayItem, Task, TaskError, TaskId, TaskStore};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::{ApiError, ErrorBody};

pub type SharedStore = Arc<RwLock<TaskStore>>;

/// Body of `POST /tasks` and `PUT /tasks/{id}/text`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskText {
    pub text: String,
}

/// Response of `PUT /tasks/{id}/text`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameResponse {
    pub renamed: bool,
    pub items: Vec<DisplayItem>,
}

pub fn app() -> Router {
    app_with_store(TaskStore::new())
}

pub fn app_with_store(store: TaskStore) -> Router {
    let db: SharedStore = Arc::new(RwLock::new(store));
    Router::new()
        .route("/tasks", get(list_tasks).post(add_task))
        .route("/tasks/{id}", get(get_task).delete(delete_task))
        .route("/tasks/{id}/toggle-completed", post(toggle_completed))
        .route("/tasks/{id}/toggle-pin", post(toggle_pin))
        .route("/tasks/{id}/text", put(rename_task))
        .route("/snapshot", get(get_snapshot).put(put_snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener, store: TaskStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}

async fn list_tasks(State(db): State<SharedStore>) -> Json<Vec<DisplayItem>> {
    Json(db.read().await.display_list())
}

async fn add_task(
    State(db): State<SharedStore>,
    Json(input): Json<TaskText>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = db.write().await.add_task(&input.text)?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(db): State<SharedStore>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, ApiError> {
    let store = db.read().await;
    store
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| TaskError::NotFound(id).into())
}

async fn delete_task(State(db): State<SharedStore>, Path(id): Path<TaskId>) -> StatusCode {
    db.write().await.delete_task(id);
    StatusCode::NO_CONTENT
}

async fn toggle_completed(
    State(db): State<SharedStore>,
    Path(id): Path<TaskId>,
) -> Json<Vec<DisplayItem>> {
    let mut store = db.write().await;
    store.toggle_completed(id);
    Json(store.display_list())
}

async fn toggle_pin(
    State(db): State<SharedStore>,
    Path(id): Path<TaskId>,
) -> Json<Vec<DisplayItem>> {
    let mut store = db.write().await;
    store.toggle_pin(id);
    Json(store.display_list())
}

async fn rename_task(
    State(db): State<SharedStore>,
    Path(id): Path<TaskId>,
    Json(input): Json<TaskText>,
) -> Json<RenameResponse> {
    let mut store = db.write().await;
    let renamed = store.rename_task(id, &input.text);
    Json(RenameResponse {
        renamed,
        items: store.display_list(),
    })
}

async fn get_snapshot(State(db): State<SharedStore>) -> Json<Vec<Task>> {
    Json(db.read().await.snapshot())
}

/// Replace the whole store with a saved sequence, keeping the pin order.
async fn put_snapshot(
    State(db): State<SharedStore>,
    Json(tasks): Json<Vec<Task>>,
) -> Result<Json<Vec<DisplayItem>>, ApiError> {
    let mut store = db.write().await;
    let restored = TaskStore::from_tasks(tasks, store.config())?;
    info!(count = restored.len(), "store replaced from snapshot");
    *store = restored;
    Ok(Json(store.display_list()))
}
