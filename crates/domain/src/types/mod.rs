//! Domain types and models
//!
//! Everything the availability engine passes between its stages. All instants
//! are `DateTime<Utc>`; calendar days are `NaiveDate` interpreted in the
//! configured reference timezone.

pub mod availability;
pub mod calendar;
pub mod credential;
pub mod interval;
pub mod sync;

pub use availability::{AvailabilityRecord, ConflictResolution};
pub use calendar::{EventTime, RawCalendarEvent};
pub use credential::{AccessCredential, TokenRefresh, UsableToken};
pub use interval::{BusyInterval, FreeInterval};
pub use sync::{DateRange, LinkStatus, SyncOutcome, SyncRequest};
