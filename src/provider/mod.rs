//! Provider integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (access token, account id)
//!     → types.rs (ProviderCredentials, read once at startup)
//!     → client.rs (authenticated GET with deadline, status translation)
//!     → types.rs (BalanceReading / FetchError)
//! ```
//!
//! # Security Constraints
//! - Access tokens ONLY from environment variables
//! - Never log tokens or raw provider error bodies
//! - Every provider call has a configurable timeout

pub mod client;
pub mod currency;
pub mod types;

#[cfg(test)]
pub(crate) mod scripted;

pub use client::{BalanceProvider, HttpBalanceProvider};
pub use types::{BalanceReading, FetchError, FetchResult, ProviderCredentials, Source};
