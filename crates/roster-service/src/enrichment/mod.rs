//! Best-effort attribute lookups for new people.
//!
//! Enrichment never fails the create: every lookup error ends up as an unset
//! field and a warning.

mod http;

pub use http::HttpEnricher;

use async_trait::async_trait;
use roster_core::Interface;

/// Attributes estimated from a first name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl Enrichment {
    /// Returns true if no attribute was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.age.is_none() && self.gender.is_none() && self.nationality.is_none()
    }
}

/// Looks up attributes for a first name.
#[async_trait]
pub trait Enricher: Interface + Send + Sync {
    /// Returns whatever could be found for `first_name`.
    async fn enrich(&self, first_name: &str) -> Enrichment;
}

/// Enricher used when lookups are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnricher;

#[async_trait]
impl Enricher for NoopEnricher {
    async fn enrich(&self, _first_name: &str) -> Enrichment {
        Enrichment::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_enricher_finds_nothing() {
        let enrichment = NoopEnricher.enrich("Ada").await;
        assert!(enrichment.is_empty());
    }
}
