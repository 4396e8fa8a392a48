//! Link record entity: one shortened destination and its expiry state.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::entities::PrincipalId;

/// Validity of a link record at a given instant.
///
/// A record starts `Active` and moves to `Expired` or `ClickExhausted`;
/// there is no transition back. Purging (removal from the store) happens
/// only through the sweeper or explicit deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Resolvable: clicks remain and the TTL has not elapsed.
    Active,
    /// The time-to-live has elapsed.
    Expired,
    /// Every permitted click has been consumed.
    ClickExhausted,
}

/// A stored link: destination, owner, limits, and consumption counters.
///
/// `created_at` is immutable after construction. `clicks_consumed` only ever
/// grows, except for the explicit reset performed by a click-limit update.
#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub destination: String,
    pub owner: PrincipalId,
    pub created_at: DateTime<Utc>,
    pub ttl_seconds: u64,
    pub click_limit: u64,
    pub clicks_consumed: u64,
}

impl LinkRecord {
    /// Creates a record with a zeroed click counter.
    ///
    /// Limits are expected to be already clamped by the caller.
    pub fn new(
        destination: String,
        owner: PrincipalId,
        created_at: DateTime<Utc>,
        ttl_seconds: u64,
        click_limit: u64,
    ) -> Self {
        Self {
            destination,
            owner,
            created_at,
            ttl_seconds,
            click_limit,
            clicks_consumed: 0,
        }
    }

    /// Instant at which the TTL elapses, or `None` when it lies beyond the
    /// representable calendar range. Such a record can only die by click
    /// exhaustion or explicit deletion.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let ttl = TimeDelta::try_seconds(i64::try_from(self.ttl_seconds).ok()?)?;
        self.created_at.checked_add_signed(ttl)
    }

    /// The single authoritative validity predicate.
    ///
    /// Both the lazy enforcement point (resolution) and the eager one (the
    /// sweeper) consult this, so the two can never diverge. Expiry is
    /// checked before click exhaustion, matching resolution's error order.
    pub fn status(&self, now: DateTime<Utc>) -> LinkStatus {
        if self.expires_at().is_some_and(|deadline| now >= deadline) {
            LinkStatus::Expired
        } else if self.clicks_consumed >= self.click_limit {
            LinkStatus::ClickExhausted
        } else {
            LinkStatus::Active
        }
    }

    /// Returns true if the record should still resolve at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == LinkStatus::Active
    }

    /// Counts one successful resolution.
    pub fn record_click(&mut self) {
        self.clicks_consumed += 1;
    }

    /// Replaces the click limit and zeroes the consumed counter.
    pub fn reset_click_limit(&mut self, new_limit: u64) {
        self.click_limit = new_limit;
        self.clicks_consumed = 0;
    }

    /// Successful resolutions still permitted.
    pub fn remaining_clicks(&self) -> u64 {
        self.click_limit.saturating_sub(self.clicks_consumed)
    }

    /// Whole seconds of lifetime left, zero once expired. Saturates at
    /// `u64::MAX` when the deadline is beyond the calendar range.
    pub fn remaining_lifetime_seconds(&self, now: DateTime<Utc>) -> u64 {
        match self.expires_at() {
            Some(deadline) => (deadline - now).num_seconds().max(0) as u64,
            None => u64::MAX,
        }
    }
}
