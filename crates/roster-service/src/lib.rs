//! # Roster Service
//!
//! Business logic for the Roster directory service.
//!
//! ```text
//!   PersonService (facade)
//!       │
//!       ├── ViewAssembler ──────────┐  read-through views, `entity:<id>`
//!       ├── ListingCacheStrategy ───┤  pages and searches, `listing:*`
//!       ├── RelationshipOrchestrator┤  symmetric edges, primary contacts
//!       └── Enricher                │
//!                                   ▼
//!                          PersonRepository + TtlCache
//! ```
//!
//! Reads populate the caches; writes only ever delete from them.

pub mod cache;
pub mod dto;
pub mod enrichment;
pub mod listing;
pub mod mappers;
pub mod orchestrator;
pub mod person_service;
pub mod view;

mod r#impl;

pub use cache::{CacheTtls, CachedListing, ListingCache, ServiceCaches, ViewCache};
pub use dto::*;
pub use enrichment::{Enricher, Enrichment, HttpEnricher, NoopEnricher};
pub use listing::ListingCacheStrategy;
pub use orchestrator::RelationshipOrchestrator;
pub use person_service::*;
pub use r#impl::PersonServiceImpl;
pub use view::ViewAssembler;
