//! # Roster Cache
//!
//! A generic, in-process key/value cache with per-entry deadlines.
//!
//! Entries expire lazily when read and are purged in bulk by a [`Sweeper`]
//! running on the Tokio runtime. The cache is parameterised by the value type
//! it stores, so every value shape gets its own instance and a lookup can
//! never observe a value of the wrong type.

pub mod cache;
pub mod metrics;
pub mod sweeper;

pub use cache::{CacheStats, TtlCache};
pub use sweeper::Sweeper;
