//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::services::{OfflineQueueService, ProcessorRegistry};
use crate::domain::value_objects::OperationKind;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::StoreFactory;
use crate::infrastructure::processors::ScanCodeProcessor;
use crate::infrastructure::reachability::ReachabilityReporter;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub queue: Arc<OfflineQueueService>,
    /// Feeds connectivity transitions to the reachability worker
    pub reachability: ReachabilityReporter,
}

impl AppState {
    pub async fn new(config: AppConfig, reachability: ReachabilityReporter) -> Result<Self> {
        let store = StoreFactory::new(config.queue.clone()).create_store().await?;

        let scan_processor = ScanCodeProcessor::new(&config.scan_api)
            .context("Failed to build scan code processor")?;
        let processors =
            ProcessorRegistry::new().with(OperationKind::ScanCode, Arc::new(scan_processor));

        let queue = OfflineQueueService::restore(store, processors)
            .await
            .context("Failed to restore offline queue")?;

        Ok(Self::from_parts(config, Arc::new(queue), reachability))
    }

    pub fn from_parts(
        config: AppConfig,
        queue: Arc<OfflineQueueService>,
        reachability: ReachabilityReporter,
    ) -> Self {
        Self {
            config,
            queue,
            reachability,
        }
    }
}
