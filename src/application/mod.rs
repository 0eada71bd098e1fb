//! Application layer - Use cases and ports
//!
//! This layer contains:
//! - Ports: interfaces the queue requires from the host (storage, processors)
//! - Services: the offline operation queue and its helpers
//! - DTOs: request/response shapes for the host bridge

pub mod dto;
pub mod ports;
pub mod services;
