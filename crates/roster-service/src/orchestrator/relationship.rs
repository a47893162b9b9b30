//! Symmetric relationship writes.
//!
//! A relationship `{a, b}` is stored as the rows `a -> b` and `b -> a`, written
//! by two separate store calls. The rows must exist together or not at all,
//! so when the second call fails the first one is undone before the error is
//! returned. Readers that catch the store between the two calls see the
//! relationship from one side only; nothing here closes that window.

use super::RelationshipOrchestrator;
use roster_core::{PersonId, RosterError, RosterResult};
use tracing::{debug, error, info, warn};

impl RelationshipOrchestrator {
    /// Relates `person_id` and `friend_id` in both directions.
    ///
    /// # Errors
    ///
    /// - `Validation` if both ids are the same person
    /// - `NotFound` if either person does not exist
    /// - `Conflict` if they are already related
    /// - any store error, after the half-written relationship was rolled back
    pub async fn add_relationship(
        &self,
        person_id: PersonId,
        friend_id: PersonId,
    ) -> RosterResult<()> {
        debug!("Adding relationship: {} <-> {}", person_id, friend_id);

        if person_id == friend_id {
            return Err(RosterError::validation(
                "a person cannot be related to themselves",
            ));
        }

        self.require_person(person_id).await?;
        self.require_person(friend_id).await?;

        let existing = self.repository.list_edge_targets(person_id).await?;
        if existing.contains(&friend_id) {
            return Err(RosterError::conflict(format!(
                "{person_id} and {friend_id} are already related"
            )));
        }

        // nothing has been written if this fails
        self.repository.add_edge(person_id, friend_id).await?;

        if let Err(e) = self.repository.add_edge(friend_id, person_id).await {
            warn!(
                "Reverse row {} -> {} failed, rolling back {} -> {}: {}",
                friend_id, person_id, person_id, friend_id, e
            );
            if let Err(rollback) = self.repository.remove_edge(person_id, friend_id).await {
                error!(
                    "Rollback failed, row {} -> {} has no reverse: {}",
                    person_id, friend_id, rollback
                );
            }
            self.invalidate_pair(person_id, friend_id);
            return Err(e);
        }

        self.invalidate_pair(person_id, friend_id);
        info!("Relationship added: {} <-> {}", person_id, friend_id);
        Ok(())
    }

    /// Removes the relationship between `person_id` and `friend_id`.
    ///
    /// A missing reverse row is tolerated: once the forward row is gone the
    /// relationship is fully removed, so the call succeeds with a warning.
    ///
    /// # Errors
    ///
    /// - `Validation` if both ids are the same person
    /// - `NotFound` if `person_id` has no row pointing at `friend_id`
    /// - any store error, after the removed forward row was restored
    pub async fn remove_relationship(
        &self,
        person_id: PersonId,
        friend_id: PersonId,
    ) -> RosterResult<()> {
        debug!("Removing relationship: {} <-> {}", person_id, friend_id);

        if person_id == friend_id {
            return Err(RosterError::validation(
                "a person cannot be related to themselves",
            ));
        }

        if !self.repository.remove_edge(person_id, friend_id).await? {
            return Err(RosterError::not_found(
                "Relationship",
                format!("{person_id}-{friend_id}"),
            ));
        }

        match self.repository.remove_edge(friend_id, person_id).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    "Reverse row {} -> {} was already missing",
                    friend_id, person_id
                );
            }
            Err(e) => {
                warn!(
                    "Removing reverse row {} -> {} failed, restoring {} -> {}: {}",
                    friend_id, person_id, person_id, friend_id, e
                );
                if let Err(restore) = self.repository.add_edge(person_id, friend_id).await {
                    error!(
                        "Restore failed, row {} -> {} is gone but its reverse remains: {}",
                        person_id, friend_id, restore
                    );
                }
                self.invalidate_pair(person_id, friend_id);
                return Err(e);
            }
        }

        self.invalidate_pair(person_id, friend_id);
        info!("Relationship removed: {} <-> {}", person_id, friend_id);
        Ok(())
    }

    fn invalidate_pair(&self, a: PersonId, b: PersonId) {
        self.assembler.invalidate_entity(a);
        self.assembler.invalidate_entity(b);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixture, person};
    use roster_core::{PersonId, RosterError};
    use roster_repository::FailurePoint;

    #[tokio::test]
    async fn test_add_writes_both_rows() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;

        f.orchestrator.add_relationship(a, b).await.unwrap();

        assert!(f.repo.has_edge(a, b));
        assert!(f.repo.has_edge(b, a));
        assert_eq!(f.repo.edge_count(), 2);
    }

    #[tokio::test]
    async fn test_add_twice_is_conflict_without_duplicates() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;
        f.orchestrator.add_relationship(a, b).await.unwrap();

        let err = f.orchestrator.add_relationship(a, b).await.unwrap_err();
        assert!(matches!(err, RosterError::Conflict(_)));
        let err = f.orchestrator.add_relationship(b, a).await.unwrap_err();
        assert!(matches!(err, RosterError::Conflict(_)));
        assert_eq!(f.repo.edge_count(), 2);
    }

    #[tokio::test]
    async fn test_add_self_is_rejected() {
        let f = fixture();
        let a = person(&f.repo, "A").await;

        let err = f.orchestrator.add_relationship(a, a).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(f.repo.edge_count(), 0);
    }

    #[tokio::test]
    async fn test_add_with_missing_person_is_not_found() {
        let f = fixture();
        let a = person(&f.repo, "A").await;

        let err = f
            .orchestrator
            .add_relationship(a, PersonId::new(999))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        let err = f
            .orchestrator
            .add_relationship(PersonId::new(999), a)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(f.repo.edge_count(), 0);
    }

    #[tokio::test]
    async fn test_first_row_failure_changes_nothing() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;
        f.repo.fail_on(FailurePoint::AddEdge { from: a, to: b });

        assert!(f.orchestrator.add_relationship(a, b).await.is_err());
        assert_eq!(f.repo.edge_count(), 0);
    }

    #[tokio::test]
    async fn test_second_row_failure_is_rolled_back() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;
        f.repo.fail_on(FailurePoint::AddEdge { from: b, to: a });

        let err = f.orchestrator.add_relationship(a, b).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(!f.repo.has_edge(a, b));
        assert!(!f.repo.has_edge(b, a));

        // the pair is usable again once the store recovers
        f.repo.clear_failures();
        f.orchestrator.add_relationship(a, b).await.unwrap();
        assert_eq!(f.repo.edge_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_rollback_still_reports_error() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;
        f.repo.fail_on(FailurePoint::AddEdge { from: b, to: a });
        f.repo.fail_on(FailurePoint::RemoveEdge { from: a, to: b });

        assert!(f.orchestrator.add_relationship(a, b).await.is_err());
        // the one-sided row is left behind and only logged
        assert!(f.repo.has_edge(a, b));
        assert!(!f.repo.has_edge(b, a));
    }

    #[tokio::test]
    async fn test_remove_deletes_both_rows() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;
        f.orchestrator.add_relationship(a, b).await.unwrap();

        f.orchestrator.remove_relationship(b, a).await.unwrap();
        assert_eq!(f.repo.edge_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;

        let err = f.orchestrator.remove_relationship(a, b).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_remove_reverse_failure_restores_forward_row() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;
        f.orchestrator.add_relationship(a, b).await.unwrap();
        f.repo.fail_on(FailurePoint::RemoveEdge { from: b, to: a });

        assert!(f.orchestrator.remove_relationship(a, b).await.is_err());
        assert!(f.repo.has_edge(a, b));
        assert!(f.repo.has_edge(b, a));
    }

    #[tokio::test]
    async fn test_remove_with_reverse_already_missing_succeeds() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;
        f.repo.add_edge(a, b).await.unwrap();

        f.orchestrator.remove_relationship(a, b).await.unwrap();
        assert_eq!(f.repo.edge_count(), 0);
    }

    #[tokio::test]
    async fn test_writes_invalidate_both_views() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;
        f.assembler.get_view(a).await.unwrap();
        f.assembler.get_view(b).await.unwrap();

        f.orchestrator.add_relationship(a, b).await.unwrap();
        assert!(!f.assembler.is_cached(a));
        assert!(!f.assembler.is_cached(b));
        assert!(f.assembler.get_view(a).await.unwrap().is_related_to(b));
        assert!(f.assembler.get_view(b).await.unwrap().is_related_to(a));

        f.orchestrator.remove_relationship(a, b).await.unwrap();
        assert!(!f.assembler.get_view(a).await.unwrap().is_related_to(b));
        assert!(!f.assembler.get_view(b).await.unwrap().is_related_to(a));
    }

    #[tokio::test]
    async fn test_rolled_back_write_invalidates_views() {
        let f = fixture();
        let a = person(&f.repo, "A").await;
        let b = person(&f.repo, "B").await;
        f.assembler.get_view(a).await.unwrap();
        f.repo.fail_on(FailurePoint::AddEdge { from: b, to: a });

        assert!(f.orchestrator.add_relationship(a, b).await.is_err());
        assert!(!f.assembler.is_cached(a));
        assert!(!f.assembler.get_view(a).await.unwrap().is_related_to(b));
    }
}
