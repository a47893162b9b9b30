//! Data Transfer Objects (DTOs).

mod contact_dto;
mod person_dto;

pub use contact_dto::*;
pub use person_dto::*;
