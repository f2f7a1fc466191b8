//! Quick balance service library.

pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod provider;
pub mod resilience;
pub mod service;

pub use config::BalanceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use service::BalanceService;
