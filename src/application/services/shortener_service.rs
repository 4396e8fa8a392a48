//! Link shortening and resolution service.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::config::Limits;
use crate::domain::clock::Clock;
use crate::domain::entities::{LinkRecord, LinkStatus, PrincipalId};
use crate::domain::store::LinkStore;
use crate::error::AppError;
use crate::utils::base62;
use crate::utils::destination::canonical_destination;

/// Fixed prefix of every issued short link. The textual form of a link is
/// always `<prefix><6-character code>`.
pub const SHORT_URL_PREFIX: &str = "clck.ru/";

/// Read-only view of one stored link at the instant of listing.
#[derive(Debug, Clone, Serialize)]
pub struct LinkSnapshot {
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub click_limit: u64,
    pub clicks_consumed: u64,
    pub remaining_clicks: u64,
    pub remaining_lifetime_seconds: u64,
}

impl LinkSnapshot {
    fn of(record: &LinkRecord, now: DateTime<Utc>) -> Self {
        Self {
            destination: record.destination.clone(),
            created_at: record.created_at,
            click_limit: record.click_limit,
            clicks_consumed: record.clicks_consumed,
            remaining_clicks: record.remaining_clicks(),
            remaining_lifetime_seconds: record.remaining_lifetime_seconds(now),
        }
    }
}

/// Service orchestrating link creation, resolution, listing, deletion, and
/// limit updates.
///
/// Owns the store behind a single lock: every mutating operation runs as one
/// writer critical section, so identifier generation, counter updates, and
/// store/index consistency cannot race (readers always see the table and the
/// owner indices in step).
pub struct ShortenerService {
    store: RwLock<LinkStore>,
    clock: Arc<dyn Clock>,
    limits: Limits,
}

impl ShortenerService {
    /// Creates a service with an injected clock.
    pub fn new(limits: Limits, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RwLock::new(LinkStore::new()),
            clock,
            limits,
        }
    }

    /// Creates a service on the wall clock.
    pub fn with_system_clock(limits: Limits) -> Self {
        Self::new(limits, Arc::new(crate::domain::clock::SystemClock))
    }

    /// Allocates a fresh principal with an empty link index.
    pub fn create_principal(&self) -> PrincipalId {
        self.store.write().create_principal()
    }

    /// All known principal ids, in no particular order.
    pub fn principal_ids(&self) -> Vec<PrincipalId> {
        self.store.read().principal_ids()
    }

    /// Shortens `destination` for `owner` and returns the full short link.
    ///
    /// The requested click limit and TTL are clamped to the configured
    /// ceilings. Dead links are swept before the new one is stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for a zero limit, zero TTL, or a
    /// destination that is not a valid HTTP(S) URL.
    /// Returns [`AppError::UnknownPrincipal`] if `owner` was never created.
    /// Returns [`AppError::CodeSpaceExhausted`] once the identifier sequence
    /// outgrows the 6-character code space.
    pub fn build_short_url(
        &self,
        owner: PrincipalId,
        destination: &str,
        requested_click_limit: u64,
        requested_ttl_seconds: u64,
    ) -> Result<String, AppError> {
        if requested_click_limit == 0 {
            return Err(AppError::InvalidInput(
                "click limit must be positive".to_string(),
            ));
        }
        if requested_ttl_seconds == 0 {
            return Err(AppError::InvalidInput(
                "link lifetime must be positive".to_string(),
            ));
        }
        let destination = canonical_destination(destination)?;

        let now = self.clock.now();
        let mut store = self.store.write();

        if store.principal(&owner).is_none() {
            return Err(AppError::UnknownPrincipal);
        }

        store.sweep(now);

        let click_limit = requested_click_limit.min(self.limits.max_click_limit);
        let ttl_seconds = requested_ttl_seconds.min(self.limits.max_link_lifetime_seconds);

        let id = store.next_identifier();
        let code = base62::encode(id).map_err(|_| AppError::CodeSpaceExhausted)?;
        let record = LinkRecord::new(destination, owner, now, ttl_seconds, click_limit);
        store.insert(id, code.clone(), record)?;

        Ok(format!("{SHORT_URL_PREFIX}{code}"))
    }

    /// Resolves a short link to its destination for `owner`, consuming one
    /// click.
    ///
    /// Accepts the full `clck.ru/...` form or the bare 6-character code.
    /// Existence and ownership are checked before expiry and click state, so
    /// a non-owner never learns whether someone else's link is still alive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MalformedCode`] if the code does not decode,
    /// [`AppError::LinkNotFound`] if no record exists for it,
    /// [`AppError::NotOwner`] if it belongs to a different principal,
    /// [`AppError::Expired`] past the TTL, and [`AppError::LimitExhausted`]
    /// once every permitted click is consumed.
    pub fn restore_long_url(
        &self,
        owner: PrincipalId,
        short_url: &str,
    ) -> Result<String, AppError> {
        let code = strip_prefix(short_url);
        let id = base62::decode(code)?;

        let now = self.clock.now();
        let mut store = self.store.write();

        let record = store.get_mut(id).ok_or(AppError::LinkNotFound)?;
        if record.owner != owner {
            return Err(AppError::NotOwner);
        }

        match record.status(now) {
            LinkStatus::Expired => Err(AppError::Expired),
            LinkStatus::ClickExhausted => Err(AppError::LimitExhausted),
            LinkStatus::Active => {
                record.record_click();
                Ok(record.destination.clone())
            }
        }
    }

    /// Lists the owner's links as snapshots keyed by their full short URL.
    ///
    /// Dead links are swept first, so a logically expired or exhausted link
    /// never shows up in the listing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownPrincipal`] if `owner` was never created.
    pub fn list_links(
        &self,
        owner: PrincipalId,
    ) -> Result<BTreeMap<String, LinkSnapshot>, AppError> {
        let now = self.clock.now();
        let mut store = self.store.write();

        if store.principal(&owner).is_none() {
            return Err(AppError::UnknownPrincipal);
        }

        store.sweep(now);

        let principal = store.principal(&owner).ok_or(AppError::UnknownPrincipal)?;
        let mut links = BTreeMap::new();
        for (code, &id) in &principal.codes {
            if let Some(record) = store.get(id) {
                links.insert(
                    format!("{SHORT_URL_PREFIX}{code}"),
                    LinkSnapshot::of(record, now),
                );
            }
        }

        Ok(links)
    }

    /// Deletes the owner's link named by `short_url`.
    ///
    /// Removal is keyed by identifier through the owner's index; two links
    /// to the same destination never cross-delete. Returns `true` exactly
    /// once per code, `false` on every repeat — idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownPrincipal`] if `owner` was never created.
    pub fn delete_link(&self, owner: PrincipalId, short_url: &str) -> Result<bool, AppError> {
        let code = strip_prefix(short_url);
        let mut store = self.store.write();

        if store.principal(&owner).is_none() {
            return Err(AppError::UnknownPrincipal);
        }

        Ok(store.remove_by_code(&owner, code))
    }

    /// Replaces the click limit of the owner's link and zeroes its consumed
    /// counter.
    ///
    /// The new limit is clamped to the configured ceiling, the same as at
    /// creation. Returns `true` if the code belongs to `owner`, `false`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for a zero limit and
    /// [`AppError::UnknownPrincipal`] if `owner` was never created.
    pub fn update_click_limit(
        &self,
        owner: PrincipalId,
        short_url: &str,
        new_limit: u64,
    ) -> Result<bool, AppError> {
        if new_limit == 0 {
            return Err(AppError::InvalidInput(
                "click limit must be positive".to_string(),
            ));
        }

        let code = strip_prefix(short_url);
        let mut store = self.store.write();

        if store.principal(&owner).is_none() {
            return Err(AppError::UnknownPrincipal);
        }

        let Some(id) = store.identifier_for(&owner, code) else {
            return Ok(false);
        };

        let clamped = new_limit.min(self.limits.max_click_limit);
        match store.get_mut(id) {
            Some(record) => {
                record.reset_click_limit(clamped);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Strips the fixed prefix, accepting bare codes as-is.
fn strip_prefix(short_url: &str) -> &str {
    short_url.strip_prefix(SHORT_URL_PREFIX).unwrap_or(short_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::MockClock;
    use chrono::TimeDelta;
    use parking_lot::Mutex;

    fn limits() -> Limits {
        Limits {
            max_link_lifetime_seconds: 3_600,
            max_click_limit: 100,
        }
    }

    /// A clock the test can advance by hand.
    fn adjustable_clock(start: DateTime<Utc>) -> (Arc<Mutex<DateTime<Utc>>>, Arc<MockClock>) {
        let instant = Arc::new(Mutex::new(start));
        let handle = Arc::clone(&instant);
        let mut clock = MockClock::new();
        clock.expect_now().returning(move || *handle.lock());
        (instant, Arc::new(clock))
    }

    fn service() -> (Arc<Mutex<DateTime<Utc>>>, ShortenerService) {
        let (instant, clock) = adjustable_clock(Utc::now());
        (instant, ShortenerService::new(limits(), clock))
    }

    #[test]
    fn test_build_short_url_returns_prefixed_code() {
        let (_, service) = service();
        let owner = service.create_principal();

        let short = service
            .build_short_url(owner, "https://example.com/page", 5, 600)
            .unwrap();

        assert_eq!(short, "clck.ru/aaaaab");
    }

    #[test]
    fn test_build_short_url_rejects_unknown_principal() {
        let (_, service) = service();
        let ghost = PrincipalId::new();

        let result = service.build_short_url(ghost, "https://example.com/", 5, 600);
        assert_eq!(result, Err(AppError::UnknownPrincipal));
    }

    #[test]
    fn test_build_short_url_rejects_non_positive_limits() {
        let (_, service) = service();
        let owner = service.create_principal();

        assert!(matches!(
            service.build_short_url(owner, "https://example.com/", 0, 600),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            service.build_short_url(owner, "https://example.com/", 5, 0),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_build_short_url_rejects_malformed_destination() {
        let (_, service) = service();
        let owner = service.create_principal();

        assert!(matches!(
            service.build_short_url(owner, "not a url", 5, 600),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            service.build_short_url(owner, "javascript:alert(1)", 5, 600),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_build_short_url_clamps_to_configured_ceilings() {
        let (_, service) = service();
        let owner = service.create_principal();

        let short = service
            .build_short_url(owner, "https://example.com/", 100 + 50, 3_600 + 50)
            .unwrap();

        let links = service.list_links(owner).unwrap();
        let snapshot = &links[&short];
        assert_eq!(snapshot.click_limit, 100);
        assert_eq!(snapshot.remaining_lifetime_seconds, 3_600);
    }

    #[test]
    fn test_uncapped_lifetime_ceiling_is_safe() {
        let (_, clock) = adjustable_clock(Utc::now());
        let service = ShortenerService::new(
            Limits {
                max_link_lifetime_seconds: u64::MAX,
                max_click_limit: 100,
            },
            clock,
        );
        let owner = service.create_principal();

        let short = service
            .build_short_url(owner, "https://example.com/", 5, u64::MAX)
            .unwrap();

        assert!(service.restore_long_url(owner, &short).is_ok());
        assert_eq!(service.list_links(owner).unwrap().len(), 1);
    }

    #[test]
    fn test_restore_long_url_consumes_exactly_the_click_limit() {
        let (_, service) = service();
        let owner = service.create_principal();
        let short = service
            .build_short_url(owner, "https://example.com/page", 3, 600)
            .unwrap();

        for _ in 0..3 {
            assert_eq!(
                service.restore_long_url(owner, &short).unwrap(),
                "https://example.com/page"
            );
        }
        assert_eq!(
            service.restore_long_url(owner, &short),
            Err(AppError::LimitExhausted)
        );
    }

    #[test]
    fn test_restore_long_url_accepts_bare_code() {
        let (_, service) = service();
        let owner = service.create_principal();
        let short = service
            .build_short_url(owner, "https://example.com/", 2, 600)
            .unwrap();
        let code = short.strip_prefix(SHORT_URL_PREFIX).unwrap();

        assert!(service.restore_long_url(owner, code).is_ok());
    }

    #[test]
    fn test_restore_long_url_expires_with_the_clock() {
        let (instant, service) = service();
        let owner = service.create_principal();
        let short = service
            .build_short_url(owner, "https://example.com/", 10, 1)
            .unwrap();

        assert!(service.restore_long_url(owner, &short).is_ok());

        *instant.lock() += TimeDelta::seconds(2);
        assert_eq!(
            service.restore_long_url(owner, &short),
            Err(AppError::Expired)
        );
    }

    #[test]
    fn test_restore_long_url_hides_state_from_non_owner() {
        let (instant, service) = service();
        let owner = service.create_principal();
        let other = service.create_principal();
        let short = service
            .build_short_url(owner, "https://example.com/", 1, 1)
            .unwrap();

        // Drive the link both expired and exhausted; the non-owner must
        // still see NotOwner, not the link's state.
        service.restore_long_url(owner, &short).unwrap();
        *instant.lock() += TimeDelta::seconds(5);

        assert_eq!(
            service.restore_long_url(other, &short),
            Err(AppError::NotOwner)
        );
    }

    #[test]
    fn test_restore_long_url_reports_missing_and_malformed_codes() {
        let (_, service) = service();
        let owner = service.create_principal();

        assert_eq!(
            service.restore_long_url(owner, "clck.ru/aaaaac"),
            Err(AppError::LinkNotFound)
        );
        assert!(matches!(
            service.restore_long_url(owner, "clck.ru/aa!aac"),
            Err(AppError::MalformedCode(_))
        ));
        assert!(matches!(
            service.restore_long_url(owner, "clck.ru/aac"),
            Err(AppError::MalformedCode(_))
        ));
    }

    #[test]
    fn test_list_links_requires_known_principal() {
        let (_, service) = service();
        let result = service.list_links(PrincipalId::new());
        assert!(matches!(result, Err(AppError::UnknownPrincipal)));
    }

    #[test]
    fn test_list_links_never_shows_dead_links() {
        let (instant, service) = service();
        let owner = service.create_principal();

        service
            .build_short_url(owner, "https://short.example/", 5, 10)
            .unwrap();
        let durable = service
            .build_short_url(owner, "https://long.example/", 5, 600)
            .unwrap();

        *instant.lock() += TimeDelta::seconds(11);

        let links = service.list_links(owner).unwrap();
        assert_eq!(links.len(), 1);
        assert!(links.contains_key(&durable));
    }

    #[test]
    fn test_sweep_runs_before_every_creation() {
        let (instant, service) = service();
        let owner = service.create_principal();

        service
            .build_short_url(owner, "https://dying.example/", 5, 10)
            .unwrap();
        *instant.lock() += TimeDelta::seconds(11);

        // Creation sweeps the expired record; only the new link remains.
        service
            .build_short_url(owner, "https://fresh.example/", 5, 600)
            .unwrap();

        let links = service.list_links(owner).unwrap();
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_delete_link_is_idempotent() {
        let (_, service) = service();
        let owner = service.create_principal();
        let short = service
            .build_short_url(owner, "https://example.com/", 5, 600)
            .unwrap();

        assert_eq!(service.delete_link(owner, &short), Ok(true));
        assert_eq!(service.delete_link(owner, &short), Ok(false));
        assert_eq!(service.delete_link(owner, &short), Ok(false));
    }

    #[test]
    fn test_delete_link_ignores_other_owners_codes() {
        let (_, service) = service();
        let owner = service.create_principal();
        let other = service.create_principal();
        let short = service
            .build_short_url(owner, "https://example.com/", 5, 600)
            .unwrap();

        assert_eq!(service.delete_link(other, &short), Ok(false));
        assert!(service.restore_long_url(owner, &short).is_ok());
    }

    #[test]
    fn test_update_click_limit_resets_consumed_counter() {
        let (_, service) = service();
        let owner = service.create_principal();
        let short = service
            .build_short_url(owner, "https://example.com/", 2, 600)
            .unwrap();

        service.restore_long_url(owner, &short).unwrap();
        service.restore_long_url(owner, &short).unwrap();
        assert_eq!(
            service.restore_long_url(owner, &short),
            Err(AppError::LimitExhausted)
        );

        assert_eq!(service.update_click_limit(owner, &short, 1), Ok(true));
        assert!(service.restore_long_url(owner, &short).is_ok());
    }

    #[test]
    fn test_update_click_limit_clamps_like_creation() {
        let (_, service) = service();
        let owner = service.create_principal();
        let short = service
            .build_short_url(owner, "https://example.com/", 2, 600)
            .unwrap();

        assert_eq!(service.update_click_limit(owner, &short, 100 + 50), Ok(true));

        let links = service.list_links(owner).unwrap();
        assert_eq!(links[&short].click_limit, 100);
    }

    #[test]
    fn test_update_click_limit_rejects_zero_and_foreign_codes() {
        let (_, service) = service();
        let owner = service.create_principal();
        let other = service.create_principal();
        let short = service
            .build_short_url(owner, "https://example.com/", 2, 600)
            .unwrap();

        assert!(matches!(
            service.update_click_limit(owner, &short, 0),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(service.update_click_limit(other, &short, 5), Ok(false));
        assert_eq!(
            service.update_click_limit(PrincipalId::new(), &short, 5),
            Err(AppError::UnknownPrincipal)
        );
    }

    #[test]
    fn test_identifiers_survive_deletion_without_reuse() {
        let (_, service) = service();
        let owner = service.create_principal();

        let first = service
            .build_short_url(owner, "https://one.example/", 5, 600)
            .unwrap();
        service.delete_link(owner, &first).unwrap();

        let second = service
            .build_short_url(owner, "https://two.example/", 5, 600)
            .unwrap();

        assert_eq!(first, "clck.ru/aaaaab");
        assert_eq!(second, "clck.ru/aaaaac");
    }
}
