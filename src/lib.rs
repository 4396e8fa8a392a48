//! # Link Shortener
//!
//! An in-process link shortener: destinations are published as fixed-width
//! 6-character codes, owned by a principal, and expire under two independent
//! conditions — elapsed lifetime (TTL) and consumed click count.
//!
//! ## Architecture
//!
//! The crate follows a layered layout:
//!
//! - **Domain Layer** ([`domain`]) - Entities, the clock seam, and the
//!   in-memory link store
//! - **Application Layer** ([`application`]) - The [`ShortenerService`]
//!   orchestrating creation, resolution, listing, deletion, and limit updates
//! - **Utilities** ([`utils`]) - The base-62 identifier codec and
//!   destination validation
//!
//! The interactive console lives in the binary (`main.rs`) and consumes only
//! the public service API. All state is process-lifetime; there is no
//! persistence and no network surface.
//!
//! ## Quick Start
//!
//! ```
//! use link_shortener::config::Limits;
//! use link_shortener::prelude::*;
//!
//! let service = ShortenerService::with_system_clock(Limits {
//!     max_link_lifetime_seconds: 86_400,
//!     max_click_limit: 10_000,
//! });
//!
//! let owner = service.create_principal();
//! let short = service
//!     .build_short_url(owner, "https://example.com/page", 5, 600)
//!     .unwrap();
//! assert_eq!(
//!     service.restore_long_url(owner, &short).unwrap(),
//!     "https://example.com/page"
//! );
//! ```
//!
//! ## Configuration
//!
//! Limit ceilings are loaded from environment variables via
//! [`config::Config`]. See the [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod utils;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkSnapshot, ShortenerService, SHORT_URL_PREFIX};
    pub use crate::config::{Config, Limits};
    pub use crate::domain::clock::{Clock, SystemClock};
    pub use crate::domain::entities::{LinkRecord, LinkStatus, PrincipalId};
    pub use crate::error::AppError;
}
