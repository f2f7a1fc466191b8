//! Balance service subsystem.
//!
//! # Data Flow
//! ```text
//! get_balance()
//!     → cache fresh?            → CACHED reading
//!     → provider fetch (+1 retry on timeout)
//!         → ok                  → cache.put, LIVE reading
//!         → Timeout/Unavailable → stale entry as CACHED, else error
//!         → Unauthorized/Malformed → error, never masked
//! ```

pub mod balance;

pub use balance::BalanceService;
