//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BalanceConfig (validated, immutable)
//!     → handed to the service and server at startup
//!
//! environment (PERSONAL_ACCESS_TOKEN, BANK_ACCOUNT_ID)
//!     → provider::ProviderCredentials (read once, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets never live in the config file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    BalanceConfig, BalanceField, CacheConfig, Environment, ListenerConfig, ObservabilityConfig,
    ProviderConfig, RetryConfig, TimeoutConfig,
};
