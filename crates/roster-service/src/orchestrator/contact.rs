//! Contact writes and the single-primary rule.
//!
//! The store lets any number of contacts be primary. Promoting a contact
//! therefore demotes the owner's current primary first, in a separate call.
//! A failure between the two calls leaves the owner without a primary
//! contact, which is accepted: no primary is better than two.

use super::RelationshipOrchestrator;
use roster_core::{Contact, ContactId, PersonId, RosterError, RosterResult};
use tracing::{debug, info, warn};

impl RelationshipOrchestrator {
    /// Adds a contact to `owner`, demoting the current primary if the new
    /// contact is primary.
    pub async fn add_contact(
        &self,
        owner: PersonId,
        address: &str,
        is_primary: bool,
    ) -> RosterResult<Contact> {
        debug!("Adding contact for person {}: primary={}", owner, is_primary);

        self.require_person(owner).await?;

        let demoted = if is_primary {
            self.demote_primaries(owner, None).await?
        } else {
            0
        };

        let contact = match self.repository.add_contact(owner, address, is_primary).await {
            Ok(contact) => contact,
            Err(e) => {
                if demoted > 0 {
                    warn!(
                        "Person {} has no primary contact: insert failed after demotion: {}",
                        owner, e
                    );
                }
                self.assembler.invalidate_entity(owner);
                return Err(e);
            }
        };

        self.assembler.invalidate_entity(owner);
        info!("Contact {} added for person {}", contact.id, owner);
        Ok(contact)
    }

    /// Changes a contact's address and/or primary flag.
    ///
    /// `None` keeps the current value. Promoting the contact demotes the
    /// owner's other primary first.
    pub async fn update_contact(
        &self,
        id: ContactId,
        address: Option<String>,
        is_primary: Option<bool>,
    ) -> RosterResult<Contact> {
        debug!("Updating contact: {}", id);

        let existing = self
            .repository
            .find_contact(id)
            .await?
            .ok_or_else(|| RosterError::not_found("Contact", id))?;
        let owner = existing.owner_id;

        let address = address.unwrap_or(existing.address);
        let is_primary = is_primary.unwrap_or(existing.is_primary);

        let demoted = if is_primary && !existing.is_primary {
            self.demote_primaries(owner, Some(id)).await?
        } else {
            0
        };

        let result = self.repository.update_contact(id, &address, is_primary).await;
        self.assembler.invalidate_entity(owner);

        match result {
            Ok(Some(contact)) => {
                info!("Contact {} updated for person {}", id, owner);
                Ok(contact)
            }
            Ok(None) => Err(RosterError::not_found("Contact", id)),
            Err(e) => {
                if demoted > 0 {
                    warn!(
                        "Person {} has no primary contact: update failed after demotion: {}",
                        owner, e
                    );
                }
                Err(e)
            }
        }
    }

    /// Deletes a contact and returns it.
    pub async fn delete_contact(&self, id: ContactId) -> RosterResult<Contact> {
        debug!("Deleting contact: {}", id);

        let contact = self
            .repository
            .delete_contact(id)
            .await?
            .ok_or_else(|| RosterError::not_found("Contact", id))?;

        self.assembler.invalidate_entity(contact.owner_id);
        info!("Contact {} deleted from person {}", id, contact.owner_id);
        Ok(contact)
    }

    /// Clears the primary flag on every contact of `owner` except `keep`.
    async fn demote_primaries(&self, owner: PersonId, keep: Option<ContactId>) -> RosterResult<usize> {
        let contacts = self.repository.list_contacts(owner).await?;
        let mut demoted = 0;
        for contact in contacts
            .iter()
            .filter(|c| c.is_primary && Some(c.id) != keep)
        {
            if let Err(e) = self
                .repository
                .update_contact(contact.id, &contact.address, false)
                .await
            {
                if demoted > 0 {
                    self.assembler.invalidate_entity(owner);
                }
                return Err(e);
            }
            debug!("Demoted contact {} of person {}", contact.id, owner);
            demoted += 1;
        }
        Ok(demoted)
    }
}
