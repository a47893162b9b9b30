//! # Roster Config
//!
//! Configuration management for the Roster directory service.
//! Supports layered configuration from files and environment variables,
//! validated as a whole before the server starts.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
