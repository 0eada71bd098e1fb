//! Queue DTOs exchanged with the host platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::ReplayState;
use crate::domain::value_objects::{OperationKind, QueuedOperation, ReachabilityState};

#[derive(Debug, Deserialize)]
pub struct EnqueueOperationRequest {
    pub kind: OperationKind,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnqueueOperationResponse {
    pub id: String,
    /// True when the device was offline, so the UI can show "queued, will sync"
    pub queued_offline: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueuedOperationResponse {
    pub id: String,
    pub kind: OperationKind,
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
    pub attempts: u32,
    pub last_error: Option<String>,
}

impl From<QueuedOperation> for QueuedOperationResponse {
    fn from(op: QueuedOperation) -> Self {
        Self {
            id: op.id.to_string(),
            kind: op.kind,
            payload: op.payload,
            enqueued_at: op.enqueued_at,
            attempts: op.attempts,
            last_error: op.last_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueueStatusResponse {
    pub reachability: ReachabilityState,
    pub replay: ReplayState,
    pub pending: usize,
}
