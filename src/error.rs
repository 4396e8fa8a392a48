//! Typed failure taxonomy for the shortener service.
//!
//! Every operation reports failure through [`AppError`]; nothing in the core
//! terminates the process or prints. Rendering is left to the front end.

use crate::utils::base62::CodecError;

/// Failures reported by the service API.
///
/// Ownership and existence checks are evaluated before expiry/limit checks,
/// so a caller never learns the state of a link it cannot access.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AppError {
    /// The acting principal has never been created.
    #[error("Principal not found")]
    UnknownPrincipal,

    /// The decoded identifier has no record in the store.
    #[error("Short link not found")]
    LinkNotFound,

    /// The link exists but belongs to a different principal.
    #[error("Short link is owned by another principal")]
    NotOwner,

    /// The link's time-to-live has elapsed.
    #[error("Short link has expired")]
    Expired,

    /// Every permitted click has been consumed.
    #[error("Click limit exhausted")]
    LimitExhausted,

    /// Malformed or non-positive input at the service boundary.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The short code could not be decoded.
    #[error("Malformed short code: {0}")]
    MalformedCode(#[from] CodecError),

    /// The identifier sequence has outgrown the 6-character code space.
    #[error("Short code space exhausted")]
    CodeSpaceExhausted,
}
