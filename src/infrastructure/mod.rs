//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: in-memory and SQLite key-value stores
//! - Processors: the scan code processor calling the check-in API
//! - Reachability: connectivity worker and prober
//! - HTTP: bridge routes for the platform shell
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod persistence;
pub mod processors;
pub mod reachability;
pub mod state;
