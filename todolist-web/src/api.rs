//! Task REST API.
//!
//! Endpoints:
//!   GET    /ping
//!   POST   /addtask
//!   GET    /viewtasks
//!   PATCH  /updatetask/{id}
//!   DELETE /deletetask/{id}
//!
//! Every response body is JSON. Errors carry an `error` key and one of the
//! fixed messages the browser front-end matches on.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use todolist::store::{StoreError, TaskStore};

/// Store handle shared by every handler. The store itself is synchronous;
/// no handler holds the lock across an await point.
pub type SharedStore = Arc<Mutex<dyn TaskStore + Send>>;

type ApiError = (StatusCode, Json<Value>);

fn lock_store(store: &SharedStore) -> MutexGuard<'_, dyn TaskStore + Send + 'static> {
    // A store operation is a single atomic mutation, so a poisoned lock
    // never guards broken state.
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

fn invalid_request() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid request. Please provide a valid task." })),
    )
}

fn invalid_task_id() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid task ID." })),
    )
}

fn map_store_err(e: StoreError, action: &str) -> ApiError {
    match e {
        StoreError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Task with specified ID not found." })),
        ),
        StoreError::Storage(e) => {
            log::error!("storage failure while {action}: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("An error occurred while {action}. Please try again.")
                })),
            )
        }
    }
}

#[derive(Deserialize)]
struct TaskPayload {
    title: String,
}

#[derive(Deserialize)]
struct StatusPayload {
    status: String,
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// Creates a task from the posted title. Any `status` the client sends is
/// ignored; new tasks always start Pending.
async fn add_task(
    State(store): State<SharedStore>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        log::warn!("rejected task payload: {e}");
        invalid_request()
    })?;
    let task = lock_store(&store)
        .create(&payload.title)
        .map_err(|e| map_store_err(e, "adding the task"))?;
    Ok(Json(json!({ "task": task })))
}

async fn view_tasks(State(store): State<SharedStore>) -> Result<Json<Value>, ApiError> {
    let tasks = lock_store(&store)
        .list()
        .map_err(|e| map_store_err(e, "fetching tasks"))?;
    Ok(Json(json!(tasks)))
}

/// Rewrites the status of one task and returns the updated record. A path
/// id that is not an integer is rejected up front rather than treated as
/// task 0.
async fn update_task(
    State(store): State<SharedStore>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id.map_err(|e| {
        log::warn!("rejected task id: {e}");
        invalid_task_id()
    })?;
    let Json(payload) = payload.map_err(|e| {
        log::warn!("rejected task payload: {e}");
        invalid_request()
    })?;
    let task = lock_store(&store)
        .update_status(id, &payload.status)
        .map_err(|e| map_store_err(e, "updating the task"))?;
    Ok(Json(json!({ "task": task })))
}

async fn delete_task(
    State(store): State<SharedStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id.map_err(|e| {
        log::warn!("rejected task id: {e}");
        invalid_task_id()
    })?;
    lock_store(&store)
        .delete(id)
        .map_err(|e| map_store_err(e, "deleting the task"))?;
    Ok(Json(json!({ "message": "Task deleted successfully!" })))
}

/// CORS for the browser front-end. Allows exactly one origin and only the
/// methods and request headers the API actually uses.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = origin.parse()?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([ORIGIN, CONTENT_TYPE]))
}

pub fn build_router(store: SharedStore, cors: CorsLayer) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/addtask", post(add_task))
        .route("/viewtasks", get(view_tasks))
        .route("/updatetask/{id}", patch(update_task))
        .route("/deletetask/{id}", delete(delete_task))
        .layer(cors)
        .with_state(store)
}
