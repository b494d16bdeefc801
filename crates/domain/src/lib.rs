//! # Rallypoint Domain
//!
//! Business domain types and models for the availability sync engine.
//!
//! This crate contains:
//! - Domain data types (credentials, calendar events, intervals, records)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Rallypoint crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
