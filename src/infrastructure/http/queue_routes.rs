//! Offline queue routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::{
    EnqueueOperationRequest, EnqueueOperationResponse, QueueStatusResponse,
    QueuedOperationResponse,
};
use crate::application::services::ReplayOutcome;
use crate::domain::value_objects::OperationId;
use crate::infrastructure::state::AppState;

/// Create queue-related routes
pub fn create_queue_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/queue", get(queue_health_check))
        .route("/api/operations", get(list_operations))
        .route("/api/operations", post(enqueue_operation))
        .route("/api/operations/replay", post(replay_operations))
        .route("/api/operations/{id}", delete(remove_operation))
}

async fn queue_health_check(State(state): State<Arc<AppState>>) -> Json<QueueStatusResponse> {
    Json(QueueStatusResponse {
        reachability: state.queue.reachability(),
        replay: state.queue.replay_state(),
        pending: state.queue.len().await,
    })
}

async fn list_operations(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<QueuedOperationResponse>> {
    let operations = state.queue.operations().await;
    Json(operations.into_iter().map(Into::into).collect())
}

async fn enqueue_operation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EnqueueOperationRequest>,
) -> (StatusCode, Json<EnqueueOperationResponse>) {
    let queued_offline = !state.queue.is_online();
    let id = state.queue.enqueue(req.kind, req.payload).await;

    (
        StatusCode::CREATED,
        Json(EnqueueOperationResponse {
            id: id.to_string(),
            queued_offline,
        }),
    )
}

/// Idempotent: removing an unknown id is still a success
async fn remove_operation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    state.queue.remove(OperationId::from_uuid(id)).await;
    StatusCode::NO_CONTENT
}

async fn replay_operations(State(state): State<Arc<AppState>>) -> Json<ReplayOutcome> {
    Json(state.queue.replay().await)
}
