//! Availability engine stages
//!
//! Control flow for one sync:
//! credentials → fetcher → normalizer → merger → free time, with the
//! conflict resolver as an optional post-step over the merged busy set.

pub mod conflicts;
pub mod credentials;
pub mod fetcher;
pub mod free_time;
pub mod merger;
pub mod normalizer;

pub use conflicts::ConflictResolver;
pub use credentials::CredentialLifecycleManager;
pub use fetcher::EventFetcher;
pub use free_time::FreeTimeCalculator;
pub use merger::merge;
pub use normalizer::{normalize, NormalizedEvents};
