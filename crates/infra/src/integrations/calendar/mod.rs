//! Calendar integration module
//!
//! Adapters implementing the core `CalendarProvider` port.

pub mod providers;

pub use providers::GoogleCalendarProvider;
