//! Connectivity routes - Entry point for the platform reachability monitor

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use std::sync::Arc;

use crate::domain::value_objects::ConnectivityChange;
use crate::infrastructure::state::AppState;

pub fn create_connectivity_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/connectivity", post(report_connectivity))
}

/// Forward a transition to the reachability worker, which applies it and
/// triggers a replay when the device comes back online
async fn report_connectivity(
    State(state): State<Arc<AppState>>,
    Json(change): Json<ConnectivityChange>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .reachability
        .report(change)
        .await
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;
    Ok(StatusCode::ACCEPTED)
}
