//! Domain model of the person directory.
//!
//! A person owns an ordered list of contacts and takes part in symmetric
//! relationships with other people. [`PersonView`] is the composite read model
//! that the service layer assembles and caches.

pub mod contact;
pub mod person;
pub mod view;

pub use contact::*;
pub use person::*;
pub use view::*;
