//! # Roster REST
//!
//! REST API layer using Axum for the Roster directory service.
//! Provides HTTP endpoints for people, their contacts and relationships,
//! plus health checks, OpenAPI documentation and a Prometheus scrape endpoint.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
