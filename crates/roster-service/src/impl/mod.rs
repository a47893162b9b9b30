//! Person service implementation.
//!
//! The trait definition lives in `person_service.rs`.

pub mod person_service_impl;

pub use person_service_impl::PersonServiceImpl;
