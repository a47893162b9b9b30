//! # Roster Server Library
//!
//! Dependency injection, application assembly and startup utilities for the
//! Roster directory server.

pub mod app;
pub mod di;
pub mod startup;
