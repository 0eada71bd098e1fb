use async_trait::async_trait;

use crate::domain::value_objects::QueuedOperation;

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("Operation rejected: {0}")]
    Rejected(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Performs the real effect of a queued operation (usually a remote call)
#[async_trait]
pub trait OperationProcessor: Send + Sync {
    async fn process(&self, operation: &QueuedOperation) -> Result<(), ProcessorError>;
}
