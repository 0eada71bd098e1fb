//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the host bridge can
//! serialize/deserialize without shaping the domain model around HTTP.

pub mod queue;

pub use queue::*;
