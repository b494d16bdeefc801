//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! engine.

// Credential lifecycle
pub const REFRESH_BUFFER_SECS: i64 = 300;
pub const REFRESH_LOCK_IDLE_SECS: u64 = 600;

// Provider fetch
pub const MAX_EVENTS_PER_FETCH: u32 = 100;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

// Working-hour window
pub const DEFAULT_DAY_START: &str = "07:00";
pub const DEFAULT_DAY_END: &str = "22:00";
pub const MIN_FREE_MINUTES: i64 = 30;
pub const DEFAULT_TIMEZONE: &str = "UTC";

// Raw event semantics
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const TRANSPARENCY_TRANSPARENT: &str = "transparent";

// Label used when an event carries no title
pub const UNTITLED_EVENT: &str = "Untitled Event";
