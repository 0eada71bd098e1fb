//! Processor registry - Maps operation kinds to their processors

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::application::ports::outbound::{OperationProcessor, ProcessorError};
use crate::domain::value_objects::{OperationKind, QueuedOperation};

/// Registry of processors, supplied by the host application at startup
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<OperationKind, Arc<dyn OperationProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor for a kind, returning the one it replaces
    pub fn register(
        &mut self,
        kind: OperationKind,
        processor: Arc<dyn OperationProcessor>,
    ) -> Option<Arc<dyn OperationProcessor>> {
        self.processors.insert(kind, processor)
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with(mut self, kind: OperationKind, processor: Arc<dyn OperationProcessor>) -> Self {
        self.register(kind, processor);
        self
    }

    pub fn get(&self, kind: &OperationKind) -> Option<Arc<dyn OperationProcessor>> {
        self.processors.get(kind).cloned()
    }

    pub fn contains(&self, kind: &OperationKind) -> bool {
        self.processors.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &OperationKind> {
        self.processors.keys()
    }
}

/// Adapts an async closure into an [`OperationProcessor`]
///
/// ```ignore
/// let processor = FnProcessor::new(|op| async move { send(op).await }.boxed());
/// ```
pub struct FnProcessor<F> {
    handler: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(QueuedOperation) -> BoxFuture<'static, Result<(), ProcessorError>> + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> OperationProcessor for FnProcessor<F>
where
    F: Fn(QueuedOperation) -> BoxFuture<'static, Result<(), ProcessorError>> + Send + Sync,
{
    async fn process(&self, operation: &QueuedOperation) -> Result<(), ProcessorError> {
        (self.handler)(operation.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use serde_json::json;

    fn noop() -> Arc<dyn OperationProcessor> {
        Arc::new(FnProcessor::new(|_op: QueuedOperation| {
            async { Ok::<(), ProcessorError>(()) }.boxed()
        }))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ProcessorRegistry::new().with(OperationKind::ScanCode, noop());

        assert!(registry.contains(&OperationKind::ScanCode));
        assert!(registry.get(&OperationKind::ScanCode).is_some());
        assert!(registry
            .get(&OperationKind::Other("favorite".to_string()))
            .is_none());
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = ProcessorRegistry::new();
        assert!(registry.register(OperationKind::ScanCode, noop()).is_none());
        assert!(registry.register(OperationKind::ScanCode, noop()).is_some());
        assert_eq!(registry.kinds().count(), 1);
    }

    #[tokio::test]
    async fn test_fn_processor_receives_operation() {
        let processor = FnProcessor::new(|op: QueuedOperation| {
            async move {
                if op.payload == json!("bad") {
                    Err(ProcessorError::Rejected("bad code".to_string()))
                } else {
                    Ok(())
                }
            }
            .boxed()
        });

        let good = QueuedOperation::new(OperationKind::ScanCode, json!("good"));
        let bad = QueuedOperation::new(OperationKind::ScanCode, json!("bad"));

        assert!(processor.process(&good).await.is_ok());
        assert!(matches!(
            processor.process(&bad).await,
            Err(ProcessorError::Rejected(_))
        ));
    }
}
