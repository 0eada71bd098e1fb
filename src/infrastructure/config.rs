//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub queue: QueueConfig,
    pub scan_api: ScanApiConfig,
    pub reachability: ReachabilityConfig,

    /// HTTP bridge port
    pub server_port: u16,
}

/// Offline queue storage
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// `memory` or `sqlite`
    pub backend: String,
    pub sqlite_path: String,
}

/// Remote check-in API behind the scan processor
#[derive(Debug, Clone)]
pub struct ScanApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ReachabilityConfig {
    /// URL probed to decide internet reachability. No probing when unset;
    /// the platform then pushes transitions through the HTTP bridge.
    pub probe_url: Option<String>,
    pub probe_interval: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            queue: QueueConfig {
                backend: env::var("QUEUE_BACKEND").unwrap_or_else(|_| "sqlite".to_string()),
                sqlite_path: env::var("QUEUE_SQLITE_PATH")
                    .unwrap_or_else(|_| "./data/offline_queue.db".to_string()),
            },

            scan_api: ScanApiConfig {
                base_url: env::var("SCAN_API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
                timeout: Duration::from_secs(
                    env::var("SCAN_API_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "10".to_string())
                        .parse()
                        .context("SCAN_API_TIMEOUT_SECS must be a number of seconds")?,
                ),
            },

            reachability: ReachabilityConfig {
                probe_url: env::var("REACHABILITY_PROBE_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
                probe_interval: Duration::from_secs(
                    env::var("REACHABILITY_PROBE_INTERVAL_SECS")
                        .unwrap_or_else(|_| "15".to_string())
                        .parse()
                        .context("REACHABILITY_PROBE_INTERVAL_SECS must be a number of seconds")?,
                ),
            },

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}
