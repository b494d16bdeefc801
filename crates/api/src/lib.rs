//! # Rallypoint API
//!
//! HTTP application layer - routes and main entry point.
//!
//! This crate contains:
//! - axum routes exposing sync, link status and free-time suggestions
//! - Application context (dependency injection)
//! - Tracing bootstrap
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod routes;
pub mod utils;

pub use context::AppContext;
pub use routes::router;
