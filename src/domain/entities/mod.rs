//! Core business entities.

pub mod link;
pub mod principal;

pub use link::{LinkRecord, LinkStatus};
pub use principal::{Principal, PrincipalId};
