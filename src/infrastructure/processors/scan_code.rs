//! Scan code processor - Submits offline ticket scans to the check-in API

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{OperationProcessor, ProcessorError};
use crate::domain::value_objects::QueuedOperation;
use crate::infrastructure::config::ScanApiConfig;

/// Body posted to `{base_url}/scans`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSubmission {
    pub code: String,
    /// When the scan happened on the device, not when it reached the server
    pub scanned_at: DateTime<Utc>,
}

impl ScanSubmission {
    /// Accepts either a bare string payload or an object with a `code` field
    pub fn from_operation(operation: &QueuedOperation) -> Result<Self, ProcessorError> {
        let code = match &operation.payload {
            serde_json::Value::String(code) => code.as_str(),
            serde_json::Value::Object(fields) => fields
                .get("code")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    ProcessorError::InvalidPayload("scan payload has no 'code' string".to_string())
                })?,
            other => {
                return Err(ProcessorError::InvalidPayload(format!(
                    "unexpected scan payload: {}",
                    other
                )))
            }
        };

        if code.trim().is_empty() {
            return Err(ProcessorError::InvalidPayload("empty scan code".to_string()));
        }

        Ok(Self {
            code: code.to_string(),
            scanned_at: operation.enqueued_at,
        })
    }
}

/// Client for the check-in API
pub struct ScanCodeProcessor {
    client: Client,
    base_url: String,
}

impl ScanCodeProcessor {
    pub fn new(config: &ScanApiConfig) -> Result<Self, ProcessorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProcessorError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl OperationProcessor for ScanCodeProcessor {
    async fn process(&self, operation: &QueuedOperation) -> Result<(), ProcessorError> {
        let submission = ScanSubmission::from_operation(operation)?;

        let response = self
            .client
            .post(format!("{}/scans", self.base_url))
            // Lets the server drop duplicates after a crash mid-replay
            .header("Idempotency-Key", operation.id.to_string())
            .json(&submission)
            .send()
            .await
            .map_err(|e| ProcessorError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProcessorError::Rejected(format!("{}: {}", status, error_text)));
        }

        tracing::info!("Submitted offline scan {} ({})", operation.id, submission.code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::OperationKind;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_submission_from_string_and_object_payloads() {
        let bare = QueuedOperation::new(OperationKind::ScanCode, json!("TICKET-1"));
        let object = QueuedOperation::new(OperationKind::ScanCode, json!({ "code": "TICKET-2" }));

        assert_eq!(ScanSubmission::from_operation(&bare).unwrap().code, "TICKET-1");
        let submission = ScanSubmission::from_operation(&object).unwrap();
        assert_eq!(submission.code, "TICKET-2");
        assert_eq!(submission.scanned_at, object.enqueued_at);
    }

    #[test]
    fn test_submission_rejects_bad_payloads() {
        for payload in [json!(42), json!({ "ticket": "x" }), json!("  ")] {
            let op = QueuedOperation::new(OperationKind::ScanCode, payload);
            assert!(matches!(
                ScanSubmission::from_operation(&op),
                Err(ProcessorError::InvalidPayload(_))
            ));
        }
    }

    async fn spawn_check_in_api() -> String {
        async fn accept_scan(Json(scan): Json<ScanSubmission>) -> StatusCode {
            if scan.code == "ALREADY-USED" {
                StatusCode::CONFLICT
            } else {
                StatusCode::CREATED
            }
        }

        let app = Router::new().route("/api/scans", post(accept_scan));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/", addr)
    }

    #[tokio::test]
    async fn test_process_posts_scan_to_api() {
        let base_url = spawn_check_in_api().await;
        let processor = ScanCodeProcessor::new(&ScanApiConfig {
            base_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        let accepted = QueuedOperation::new(OperationKind::ScanCode, json!("TICKET-1"));
        assert!(processor.process(&accepted).await.is_ok());

        let used = QueuedOperation::new(OperationKind::ScanCode, json!("ALREADY-USED"));
        assert!(matches!(
            processor.process(&used).await,
            Err(ProcessorError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_a_transport_error() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let processor = ScanCodeProcessor::new(&ScanApiConfig {
            base_url: format!("http://{}", addr),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let op = QueuedOperation::new(OperationKind::ScanCode, json!("TICKET-1"));
        assert!(matches!(
            processor.process(&op).await,
            Err(ProcessorError::Transport(_))
        ));
    }
}
