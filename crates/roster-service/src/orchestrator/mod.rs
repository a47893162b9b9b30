//! Multi-step writes that the store cannot make atomic on its own.
//!
//! - [`relationship`]: a relationship is two directed rows written one after
//!   the other, with a compensating write when the second one fails.
//! - [`contact`]: at most one primary contact per person, kept by demoting
//!   the old primary before writing the new one.
//!
//! Every operation invalidates the cached views it touched before returning,
//! whether it succeeded or not.

mod contact;
mod relationship;

use crate::view::ViewAssembler;
use roster_core::{Person, PersonId, RosterError, RosterResult};
use roster_repository::PersonRepository;
use std::sync::Arc;

/// Runs relationship and contact writes against the store.
pub struct RelationshipOrchestrator {
    repository: Arc<dyn PersonRepository>,
    assembler: Arc<ViewAssembler>,
}

impl RelationshipOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(repository: Arc<dyn PersonRepository>, assembler: Arc<ViewAssembler>) -> Self {
        Self {
            repository,
            assembler,
        }
    }

    async fn require_person(&self, id: PersonId) -> RosterResult<Person> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::not_found("Person", id))
    }
}

impl std::fmt::Debug for RelationshipOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationshipOrchestrator").finish_non_exhaustive()
    }
}
