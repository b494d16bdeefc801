//! # Rallypoint Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite implementations of the credential and availability stores
//! - HTTP client wrapper
//! - Google Calendar provider
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `rallypoint-core`
//! - Contains all "impure" code (I/O)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use http::*;
pub use integrations::*;
