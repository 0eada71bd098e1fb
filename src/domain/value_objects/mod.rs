//! Value objects - Immutable objects defined by their attributes

mod ids;
mod operation;
mod reachability;

pub use ids::*;
pub use operation::{OperationKind, QueuedOperation};
pub use reachability::{ConnectivityChange, ReachabilityState};
