//! Ticket Sync Engine - Offline operation queue for the ticketing app
//!
//! Operations the app cannot perform without network (ticket scans at the door,
//! mostly) are queued durably and replayed in submission order once
//! reachability is restored.

pub mod application;
pub mod domain;
pub mod infrastructure;
