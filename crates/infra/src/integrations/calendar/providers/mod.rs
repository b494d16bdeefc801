//! Calendar provider implementations

pub mod google;

pub use google::GoogleCalendarProvider;
