//! In-memory link store: identifier generator, link table, and owner indices.
//!
//! One owned aggregate holds everything mutable. The link table is the sole
//! authority mapping identifiers to records; each principal's code index is a
//! derived view updated in the same `&mut self` call, so the two can never be
//! observed out of step.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::entities::{LinkRecord, Principal, PrincipalId};
use crate::error::AppError;

/// Internal monotonic key for a link. Issued once, never reused.
pub type Identifier = u64;

/// The global table of link records and the principal registry.
#[derive(Debug, Default)]
pub struct LinkStore {
    links: HashMap<Identifier, LinkRecord>,
    principals: HashMap<PrincipalId, Principal>,
    last_id: Identifier,
}

impl LinkStore {
    /// Creates an empty store. The first issued identifier is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next identifier. Strictly increasing, even across deletes.
    pub fn next_identifier(&mut self) -> Identifier {
        self.last_id += 1;
        self.last_id
    }

    /// Registers a fresh principal with an empty code index.
    pub fn create_principal(&mut self) -> PrincipalId {
        let id = PrincipalId::new();
        self.principals.insert(id, Principal::new(id));
        id
    }

    /// Looks up a principal by id.
    pub fn principal(&self, id: &PrincipalId) -> Option<&Principal> {
        self.principals.get(id)
    }

    /// All registered principal ids.
    pub fn principal_ids(&self) -> Vec<PrincipalId> {
        self.principals.keys().copied().collect()
    }

    /// Stores a record under `id` and registers `code` in the owner's index.
    ///
    /// Table and index are updated in the same critical section; callers
    /// never observe one without the other.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownPrincipal`] if the record's owner has not
    /// been created; nothing is stored in that case.
    pub fn insert(
        &mut self,
        id: Identifier,
        code: String,
        record: LinkRecord,
    ) -> Result<(), AppError> {
        let principal = self
            .principals
            .get_mut(&record.owner)
            .ok_or(AppError::UnknownPrincipal)?;
        principal.codes.insert(code, id);
        self.links.insert(id, record);
        Ok(())
    }

    /// Looks up a record by identifier.
    pub fn get(&self, id: Identifier) -> Option<&LinkRecord> {
        self.links.get(&id)
    }

    /// Mutable lookup, used by resolution to bump the click counter.
    pub fn get_mut(&mut self, id: Identifier) -> Option<&mut LinkRecord> {
        self.links.get_mut(&id)
    }

    /// Resolves a short code through an owner's index.
    pub fn identifier_for(&self, owner: &PrincipalId, code: &str) -> Option<Identifier> {
        self.principals.get(owner)?.codes.get(code).copied()
    }

    /// Removes the link named `code` from both the owner's index and the
    /// table. Removal is keyed by identifier, so two links sharing a
    /// destination never cross-delete.
    ///
    /// Returns `false` (and removes nothing) when the code is not in the
    /// owner's index, which makes repeat deletion idempotent.
    pub fn remove_by_code(&mut self, owner: &PrincipalId, code: &str) -> bool {
        let Some(principal) = self.principals.get_mut(owner) else {
            return false;
        };
        let Some(id) = principal.codes.remove(code) else {
            return false;
        };
        self.links.remove(&id);
        true
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when no links are stored.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Evicts every record that is no longer `Active` at `now` from the
    /// table and from its owner's index. Returns the purge count.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let dead: Vec<Identifier> = self
            .links
            .iter()
            .filter(|(_, record)| !record.is_active(now))
            .map(|(&id, _)| id)
            .collect();

        for id in &dead {
            if let Some(record) = self.links.remove(id)
                && let Some(principal) = self.principals.get_mut(&record.owner)
            {
                principal.codes.retain(|_, linked| linked != id);
            }
        }

        dead.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn record(owner: PrincipalId, destination: &str, ttl: u64, clicks: u64) -> LinkRecord {
        LinkRecord::new(destination.to_string(), owner, Utc::now(), ttl, clicks)
    }

    #[test]
    fn test_identifiers_start_at_one_and_increase() {
        let mut store = LinkStore::new();
        assert_eq!(store.next_identifier(), 1);
        assert_eq!(store.next_identifier(), 2);
        assert_eq!(store.next_identifier(), 3);
    }

    #[test]
    fn test_identifiers_are_not_reused_after_removal() {
        let mut store = LinkStore::new();
        let owner = store.create_principal();

        let id = store.next_identifier();
        store
            .insert(id, "aaaaab".to_string(), record(owner, "https://a.example/", 60, 5))
            .unwrap();
        assert!(store.remove_by_code(&owner, "aaaaab"));

        assert_eq!(store.next_identifier(), 2);
    }

    #[test]
    fn test_insert_requires_known_principal() {
        let mut store = LinkStore::new();
        let ghost = PrincipalId::new();

        let id = store.next_identifier();
        let result = store.insert(id, "aaaaab".to_string(), record(ghost, "https://a.example/", 60, 5));

        assert_eq!(result, Err(AppError::UnknownPrincipal));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_registers_table_and_index_together() {
        let mut store = LinkStore::new();
        let owner = store.create_principal();

        let id = store.next_identifier();
        store
            .insert(id, "aaaaab".to_string(), record(owner, "https://a.example/", 60, 5))
            .unwrap();

        assert_eq!(store.identifier_for(&owner, "aaaaab"), Some(id));
        assert!(store.get(id).is_some());
    }

    #[test]
    fn test_remove_by_code_is_idempotent() {
        let mut store = LinkStore::new();
        let owner = store.create_principal();

        let id = store.next_identifier();
        store
            .insert(id, "aaaaab".to_string(), record(owner, "https://a.example/", 60, 5))
            .unwrap();

        assert!(store.remove_by_code(&owner, "aaaaab"));
        assert!(!store.remove_by_code(&owner, "aaaaab"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_sweep_purges_expired_from_both_sides() {
        let mut store = LinkStore::new();
        let owner = store.create_principal();

        let id = store.next_identifier();
        store
            .insert(id, "aaaaab".to_string(), record(owner, "https://a.example/", 10, 5))
            .unwrap();

        let later = Utc::now() + TimeDelta::seconds(11);
        assert_eq!(store.sweep(later), 1);
        assert!(store.is_empty());
        assert_eq!(store.identifier_for(&owner, "aaaaab"), None);
    }

    #[test]
    fn test_sweep_purges_click_exhausted() {
        let mut store = LinkStore::new();
        let owner = store.create_principal();

        let id = store.next_identifier();
        let mut link = record(owner, "https://a.example/", 600, 1);
        link.record_click();
        store.insert(id, "aaaaab".to_string(), link).unwrap();

        assert_eq!(store.sweep(Utc::now()), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_sweep_spares_twin_link_to_same_destination() {
        // Two links owned by one principal pointing at the same destination
        // are independent records; expiring one must not remove the other.
        let mut store = LinkStore::new();
        let owner = store.create_principal();

        let short_lived = store.next_identifier();
        store
            .insert(
                short_lived,
                "aaaaab".to_string(),
                record(owner, "https://same.example/", 10, 5),
            )
            .unwrap();

        let long_lived = store.next_identifier();
        store
            .insert(
                long_lived,
                "aaaaac".to_string(),
                record(owner, "https://same.example/", 600, 5),
            )
            .unwrap();

        let later = Utc::now() + TimeDelta::seconds(11);
        assert_eq!(store.sweep(later), 1);

        assert!(store.get(short_lived).is_none());
        assert!(store.get(long_lived).is_some());
        assert_eq!(store.identifier_for(&owner, "aaaaac"), Some(long_lived));
        assert_eq!(store.identifier_for(&owner, "aaaaab"), None);
    }

    #[test]
    fn test_sweep_on_fresh_links_removes_nothing() {
        let mut store = LinkStore::new();
        let owner = store.create_principal();

        let id = store.next_identifier();
        store
            .insert(id, "aaaaab".to_string(), record(owner, "https://a.example/", 600, 5))
            .unwrap();

        assert_eq!(store.sweep(Utc::now()), 0);
        assert_eq!(store.len(), 1);
    }
}
