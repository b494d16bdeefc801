//! Database implementations

pub mod availability_repository;
pub mod credential_repository;
pub mod manager;

pub use availability_repository::SqliteAvailabilityStore;
pub use credential_repository::SqliteCredentialStore;
pub use manager::{DbManager, SqliteConnection, SqlitePool};
