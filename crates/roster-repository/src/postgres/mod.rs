//! PostgreSQL implementations.

mod person_repository;

pub use person_repository::PgPersonRepository;
