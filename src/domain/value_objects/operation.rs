//! Queued operation value object
//!
//! A `QueuedOperation` is a unit of deferred work: something the user did while the
//! device could not reach the network, waiting to be replayed by the processor
//! registered for its kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OperationId;

/// Tag selecting which processor handles an operation's payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// A ticket QR code was scanned at the door
    ScanCode,
    /// Host-defined operation kind
    Other(String),
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::ScanCode => write!(f, "scan_code"),
            OperationKind::Other(name) => write!(f, "other:{}", name),
        }
    }
}

/// An operation waiting in the offline queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedOperation {
    pub id: OperationId,
    pub kind: OperationKind,
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
    /// Failed replay attempts so far. Diagnostic only; there is no retry cap.
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub last_error: Option<String>,
}

impl QueuedOperation {
    pub fn new(kind: OperationKind, payload: serde_json::Value) -> Self {
        Self {
            id: OperationId::new(),
            kind,
            payload,
            enqueued_at: Utc::now(),
            attempts: 0,
            last_error: None,
        }
    }

    /// Record a failed replay attempt
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.attempts = self.attempts.saturating_add(1);
        self.last_error = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_wire_format() {
        assert_eq!(
            serde_json::to_value(OperationKind::ScanCode).unwrap(),
            json!("scan_code")
        );
        assert_eq!(
            serde_json::to_value(OperationKind::Other("favorite".to_string())).unwrap(),
            json!({ "other": "favorite" })
        );
    }

    #[test]
    fn test_record_failure_counts_attempts() {
        let mut op = QueuedOperation::new(OperationKind::ScanCode, json!({ "code": "abc" }));
        assert_eq!(op.attempts, 0);

        op.record_failure("timeout");
        op.record_failure("rejected");

        assert_eq!(op.attempts, 2);
        assert_eq!(op.last_error.as_deref(), Some("rejected"));
    }

    #[test]
    fn test_legacy_record_without_diagnostics_deserializes() {
        let id = OperationId::new();
        let raw = json!({
            "id": id,
            "kind": "scan_code",
            "payload": "code1",
            "enqueued_at": "2026-01-01T10:00:00Z",
        });

        let op: QueuedOperation = serde_json::from_value(raw).unwrap();
        assert_eq!(op.id, id);
        assert_eq!(op.attempts, 0);
        assert!(op.last_error.is_none());
    }
}
