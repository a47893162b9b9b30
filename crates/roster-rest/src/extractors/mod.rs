//! Custom Axum extractors.

mod pagination;
mod path;
mod validated;

pub use pagination::*;
pub use path::*;
pub use validated::*;
