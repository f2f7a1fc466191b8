//! Balance cache subsystem.
//!
//! # Data Flow
//! ```text
//! service lookup:
//!     → slot.get()        (fresh entries only)
//!     → slot.get_stale()  (any retained entry, used as a fallback)
//!
//! successful fetch:
//!     → slot.put(reading, ttl)  (build new entry, swap it in)
//! ```
//!
//! # Design Decisions
//! - One slot: the service tracks a single account
//! - Entries are immutable snapshots behind `ArcSwapOption`; readers never
//!   see a half-written entry and the last writer wins
//! - Expiry only changes how an entry may be used; it is never evicted

pub mod slot;

pub use slot::{BalanceCache, CacheEntry};
