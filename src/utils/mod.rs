//! Shared utilities: the identifier codec and destination validation.

pub mod base62;
pub mod destination;
