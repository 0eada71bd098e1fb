//! Reachability plumbing between the platform monitor and the offline queue
//!
//! Connectivity transitions arrive on an mpsc channel, either pushed by the
//! platform through the HTTP bridge or produced by the optional prober. The worker
//! applies each one to the queue and starts a replay on every offline -> online
//! transition. The queue itself never spawns work.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::mpsc;

use crate::application::services::OfflineQueueService;
use crate::domain::value_objects::ConnectivityChange;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, thiserror::Error)]
#[error("Reachability worker is not running")]
pub struct ReachabilityClosed;

/// Cloneable sender side used to report connectivity transitions
#[derive(Clone)]
pub struct ReachabilityReporter {
    sender: mpsc::Sender<ConnectivityChange>,
}

impl ReachabilityReporter {
    pub async fn report(&self, change: ConnectivityChange) -> Result<(), ReachabilityClosed> {
        self.sender.send(change).await.map_err(|_| ReachabilityClosed)
    }
}

pub fn reachability_channel() -> (ReachabilityReporter, mpsc::Receiver<ConnectivityChange>) {
    let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
    (ReachabilityReporter { sender }, receiver)
}

/// Worker that applies connectivity transitions and triggers replays
///
/// Replays run in their own task so a drop in connectivity reported mid-replay
/// still reaches the queue. A reconnect that overlaps a running pass waits for it
/// and replays again rather than being dropped.
pub async fn reachability_worker(
    queue: Arc<OfflineQueueService>,
    mut events: mpsc::Receiver<ConnectivityChange>,
) {
    tracing::info!("Starting reachability worker");
    while let Some(change) = events.recv().await {
        if !queue.apply_connectivity(change) {
            continue;
        }

        let queue = queue.clone();
        tokio::spawn(async move {
            let outcome = queue.replay_coalesced().await;
            tracing::debug!("Replay after reconnect: {:?}", outcome);
        });
    }
    tracing::info!("Reachability channel closed, stopping worker");
}

/// Periodically probes a URL and reports the result as a connectivity change
///
/// Stops once the worker side of the channel is gone.
pub async fn reachability_prober(
    client: Client,
    probe_url: String,
    interval: Duration,
    reporter: ReachabilityReporter,
) {
    tracing::info!("Starting reachability prober for {}", probe_url);
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;

        let change = match client.head(&probe_url).send().await {
            Ok(response) => ConnectivityChange {
                connected: true,
                internet_reachable: !response.status().is_server_error(),
            },
            // A timeout means packets leave the device but nothing answers
            Err(e) if e.is_timeout() => ConnectivityChange {
                connected: true,
                internet_reachable: false,
            },
            Err(e) => {
                tracing::debug!("Reachability probe failed: {}", e);
                ConnectivityChange {
                    connected: false,
                    internet_reachable: false,
                }
            }
        };

        if reporter.report(change).await.is_err() {
            break;
        }
    }
    tracing::info!("Reachability prober stopped");
}
