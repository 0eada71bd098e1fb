//! Domain layer - Core queue concepts with no external dependencies
//!
//! This layer contains:
//! - Value Objects: operation identifiers, queued operations, reachability

pub mod value_objects;
