//! HTTP bridge routes
//!
//! The platform shell (screens, scanner, reachability monitor) talks to the
//! queue through these routes.

mod connectivity_routes;
mod queue_routes;

use axum::Router;
use std::sync::Arc;

use crate::infrastructure::state::AppState;

pub use connectivity_routes::create_connectivity_routes;
pub use queue_routes::create_queue_routes;

/// Create all bridge routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(create_queue_routes())
        .merge(create_connectivity_routes())
}
