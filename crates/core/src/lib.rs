//! # Rallypoint Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the credential store, calendar
//!   provider and availability store
//! - The availability engine stages (credential lifecycle, fetch, normalize,
//!   merge, free time, conflicts)
//! - The sync service orchestrating them
//!
//! ## Architecture Principles
//! - Only depends on `rallypoint-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod availability;
pub mod calendar_ports;
pub mod clock;
pub mod engine;
pub mod sync;
pub mod user;

// Re-export specific items to avoid ambiguity
pub use availability::ports::AvailabilityStore;
pub use calendar_ports::CalendarProvider;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{
    merge, normalize, ConflictResolver, CredentialLifecycleManager, EventFetcher,
    FreeTimeCalculator, NormalizedEvents,
};
pub use sync::{AvailabilitySyncService, SyncPorts, SyncSettings};
pub use user::ports::CredentialStore;
