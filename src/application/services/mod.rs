//! Application services - Use case implementations
//!
//! The offline queue is the only stateful service. It is constructed once by the
//! composition root and shared behind an `Arc` with whatever code needs to enqueue.

pub mod offline_queue_service;
pub mod persisted_value;
pub mod processor_registry;

pub use offline_queue_service::{
    OfflineQueueService, ReplayOutcome, ReplayState, ReplaySummary, QUEUE_STORAGE_KEY,
};
pub use persisted_value::PersistedValue;
pub use processor_registry::{FnProcessor, ProcessorRegistry};
