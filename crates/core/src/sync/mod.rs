//! Availability sync orchestration

pub mod service;

pub use service::{AvailabilitySyncService, SyncPorts, SyncSettings};
