//! Cache key generators for consistent key naming.

use roster_core::{PageRequest, PersonId};

/// Prefix of single-person view keys.
pub const ENTITY_PREFIX: &str = "entity:";

/// Prefix shared by every listing key. Any mutation clears it as a whole.
pub const LISTING_PREFIX: &str = "listing:";

/// Generate the cache key of a person's view.
#[must_use]
pub fn entity(id: PersonId) -> String {
    format!("{ENTITY_PREFIX}{id}")
}

/// Generate the cache key of one listing page.
#[must_use]
pub fn listing_page(page: PageRequest) -> String {
    format!("{LISTING_PREFIX}limit={}:offset={}", page.limit, page.offset)
}

/// Generate the cache key of a last-name search.
#[must_use]
pub fn listing_by_last_name(last_name: &str) -> String {
    format!("{LISTING_PREFIX}last_name={}", last_name.to_lowercase())
}
