//! # Roster Repository
//!
//! The record store behind the directory service.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn PersonRepository>   (record store interface)
//! PgPersonRepository               (PostgreSQL / SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```
//!
//! With the `testing` feature the crate also provides
//! [`InMemoryPersonRepository`], a store that can be told to fail chosen
//! operations so that compensation paths in the service layer can be
//! exercised.

pub mod pool;
pub mod postgres;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use pool::*;
pub use postgres::PgPersonRepository;
pub use traits::*;

#[cfg(any(test, feature = "testing"))]
pub use memory::{EdgeGate, FailurePoint, InMemoryPersonRepository};
