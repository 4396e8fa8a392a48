//! Time source seam.
//!
//! Expiry decisions depend on the current instant, so the service takes the
//! clock as an injected collaborator instead of calling `Utc::now()` inline.
//! Tests substitute a controllable implementation to drive TTL boundaries
//! deterministically.

use chrono::{DateTime, Utc};

/// Source of the current instant.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
