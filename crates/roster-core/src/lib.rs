//! # Roster Core
//!
//! Core types, traits, and error definitions for the Roster directory service.
//! Every other crate in the workspace builds on the error taxonomy, typed ids,
//! pagination and domain model defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
