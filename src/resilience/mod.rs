//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Provider fetch:
//!     → timeouts.rs (enforce the outbound deadline)
//!     → On timeout: retries.rs (one more attempt after the backoff.rs pause)
//!     → Still failing: service falls back to the stale cache entry if allowed
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retries are bounded so a request never waits on more than two fetches

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::RetryPolicy;
