//! Offline Queue Service - Buffers operations while offline and replays them in order
//!
//! The queue holds operations the device could not perform without network
//! reachability (e.g. a ticket scan at the door) and replays them strictly in
//! submission order once the host reports that connectivity is back.
//!
//! Every mutation is written through to the key-value store before returning, so
//! the persisted list and the in-memory list never diverge except after a failed
//! write, which is logged and healed by the next successful one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, Notify};

use crate::application::ports::outbound::{KeyValueStorePort, PersistenceError, ProcessorError};
use crate::application::services::persisted_value::PersistedValue;
use crate::application::services::processor_registry::ProcessorRegistry;
use crate::domain::value_objects::{
    ConnectivityChange, OperationId, OperationKind, QueuedOperation, ReachabilityState,
};

/// Storage key holding the serialized operation list
pub const QUEUE_STORAGE_KEY: &str = "offline_operation_queue";

/// Whether a replay is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayState {
    Idle,
    Replaying,
}

/// Counts from one replay pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Operations with no registered processor
    pub unhandled: usize,
    /// Operations not attempted because connectivity dropped mid-replay
    pub deferred: usize,
}

/// Result of a replay trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplayOutcome {
    Offline,
    AlreadyRunning,
    Completed(ReplaySummary),
}

/// Clears the replay flag when the replay future finishes or is dropped,
/// waking triggers waiting in `replay_coalesced`
struct ReplayGuard<'a> {
    flag: &'a AtomicBool,
    finished: &'a Notify,
}

impl<'a> ReplayGuard<'a> {
    fn acquire(flag: &'a AtomicBool, finished: &'a Notify) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag, finished })
    }
}

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.finished.notify_waiters();
    }
}

/// The offline operation queue
pub struct OfflineQueueService {
    storage: PersistedValue<Vec<QueuedOperation>>,
    operations: Mutex<Vec<QueuedOperation>>,
    online: AtomicBool,
    replaying: AtomicBool,
    replay_finished: Notify,
    processors: ProcessorRegistry,
}

impl OfflineQueueService {
    /// Restore the queue from the store, picking up operations left by a previous run
    ///
    /// An unreachable backend is returned as an error. A stored list that no longer
    /// decodes is logged and the queue starts empty.
    pub async fn restore(
        store: Arc<dyn KeyValueStorePort>,
        processors: ProcessorRegistry,
    ) -> Result<Self, PersistenceError> {
        let storage = PersistedValue::new(store, QUEUE_STORAGE_KEY);

        let operations = match storage.load().await {
            Ok(Some(operations)) => operations,
            Ok(None) => Vec::new(),
            Err(PersistenceError::Serialization(e)) => {
                tracing::warn!(
                    "Discarding undecodable offline queue stored under '{}': {}",
                    storage.key(),
                    e
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        tracing::info!("Restored offline queue with {} operation(s)", operations.len());

        Ok(Self {
            storage,
            operations: Mutex::new(operations),
            online: AtomicBool::new(true),
            replaying: AtomicBool::new(false),
            replay_finished: Notify::new(),
            processors,
        })
    }

    /// Append an operation and persist the queue
    ///
    /// Never fails: a persistence error is logged and the operation stays queued
    /// in memory until the next successful write.
    pub async fn enqueue(&self, kind: OperationKind, payload: serde_json::Value) -> OperationId {
        let operation = QueuedOperation::new(kind, payload);
        let id = operation.id;

        let mut operations = self.operations.lock().await;
        tracing::info!(
            "Queued {} operation {} (depth {}, online: {})",
            operation.kind,
            id,
            operations.len() + 1,
            self.is_online()
        );
        operations.push(operation);
        self.persist(&operations).await;

        id
    }

    /// Remove an operation. Returns `false` (and writes nothing) if it was not queued.
    pub async fn remove(&self, id: OperationId) -> bool {
        let mut operations = self.operations.lock().await;
        let Some(index) = operations.iter().position(|op| op.id == id) else {
            return false;
        };

        operations.remove(index);
        self.persist(&operations).await;
        tracing::debug!("Removed operation {} (depth {})", id, operations.len());
        true
    }

    /// Update reachability. Returns `true` on an offline -> online transition,
    /// which is the host's cue to call [`replay`](Self::replay).
    pub fn set_online_status(&self, is_online: bool) -> bool {
        let was_online = self.online.swap(is_online, Ordering::AcqRel);
        if was_online != is_online {
            tracing::info!(
                "Reachability changed: {:?} -> {:?}",
                ReachabilityState::from(was_online),
                ReachabilityState::from(is_online)
            );
        }
        !was_online && is_online
    }

    pub fn apply_connectivity(&self, change: ConnectivityChange) -> bool {
        self.set_online_status(change.is_online())
    }

    /// Attempt every queued operation in submission order
    ///
    /// Works on a snapshot taken at the start, so operations enqueued meanwhile wait
    /// for the next pass. Each success is removed immediately; failures stay queued
    /// for the next pass. If connectivity drops mid-pass the rest is deferred.
    pub async fn replay(&self) -> ReplayOutcome {
        if !self.is_online() {
            tracing::debug!("Skipping replay while offline");
            return ReplayOutcome::Offline;
        }

        let Some(_guard) = ReplayGuard::acquire(&self.replaying, &self.replay_finished) else {
            tracing::debug!("Replay already in progress, ignoring trigger");
            return ReplayOutcome::AlreadyRunning;
        };

        let snapshot = self.operations().await;
        if snapshot.is_empty() {
            return ReplayOutcome::Completed(ReplaySummary::default());
        }
        tracing::info!("Replaying {} queued operation(s)", snapshot.len());

        let mut summary = ReplaySummary::default();
        let total = snapshot.len();

        for (index, operation) in snapshot.into_iter().enumerate() {
            if !self.is_online() {
                summary.deferred = total - index;
                tracing::warn!(
                    "Connectivity lost during replay, deferring {} operation(s)",
                    summary.deferred
                );
                break;
            }

            let Some(processor) = self.processors.get(&operation.kind) else {
                tracing::warn!(
                    "No processor registered for {} operation {}, leaving it queued",
                    operation.kind,
                    operation.id
                );
                summary.unhandled += 1;
                continue;
            };

            // Cancelled by the caller since the snapshot was taken
            if self.get(operation.id).await.is_none() {
                tracing::debug!("Operation {} was removed during replay, skipping", operation.id);
                continue;
            }

            tracing::debug!("Processing {} operation {}", operation.kind, operation.id);
            match processor.process(&operation).await {
                Ok(()) => {
                    self.remove(operation.id).await;
                    summary.succeeded += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to process {} operation {}: {}",
                        operation.kind,
                        operation.id,
                        e
                    );
                    self.record_failure(operation.id, &e).await;
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            "Replay finished: {} succeeded, {} failed, {} unhandled, {} deferred",
            summary.succeeded,
            summary.failed,
            summary.unhandled,
            summary.deferred
        );
        ReplayOutcome::Completed(summary)
    }

    /// Replay, without dropping triggers that overlap a running pass
    ///
    /// If a pass is already running this waits for it to finish and runs one more,
    /// so operations enqueued meanwhile are not left behind. A pass cut short by a
    /// connectivity drop is re-run when the queue is already back online.
    pub async fn replay_coalesced(&self) -> ReplayOutcome {
        loop {
            let finished = self.replay_finished.notified();
            tokio::pin!(finished);
            finished.as_mut().enable();

            match self.replay().await {
                ReplayOutcome::AlreadyRunning => finished.await,
                ReplayOutcome::Completed(summary) if summary.deferred > 0 && self.is_online() => {
                    tracing::debug!(
                        "Back online before replay settled, retrying {} deferred operation(s)",
                        summary.deferred
                    );
                }
                outcome => return outcome,
            }
        }
    }

    /// Re-write the current list, e.g. after an earlier write failed
    pub async fn flush(&self) -> Result<(), PersistenceError> {
        let operations = self.operations.lock().await;
        self.storage.save(&operations).await
    }

    /// Ordered snapshot of the queue
    pub async fn operations(&self) -> Vec<QueuedOperation> {
        self.operations.lock().await.clone()
    }

    pub async fn get(&self, id: OperationId) -> Option<QueuedOperation> {
        self.operations
            .lock()
            .await
            .iter()
            .find(|op| op.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.operations.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.operations.lock().await.is_empty()
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    pub fn reachability(&self) -> ReachabilityState {
        self.is_online().into()
    }

    pub fn replay_state(&self) -> ReplayState {
        if self.replaying.load(Ordering::Acquire) {
            ReplayState::Replaying
        } else {
            ReplayState::Idle
        }
    }

    async fn record_failure(&self, id: OperationId, error: &ProcessorError) {
        let mut operations = self.operations.lock().await;
        if let Some(operation) = operations.iter_mut().find(|op| op.id == id) {
            operation.record_failure(error.to_string());
            self.persist(&operations).await;
        }
    }

    async fn persist(&self, operations: &Vec<QueuedOperation>) {
        if let Err(e) = self.storage.save(operations).await {
            tracing::error!(
                "Failed to persist offline queue ({} operation(s) kept in memory): {}",
                operations.len(),
                e
            );
        }
    }
}
