//! Owning principal: an opaque identifier and its view of issued codes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::store::Identifier;

/// Opaque identifier of a link owner. No credentials are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    /// Allocates a fresh random principal identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A principal and its owner index.
///
/// The index maps issued short codes to the store identifier of the record
/// they name. It is a derived view; the store's identifier table remains the
/// source of truth, and the two are only ever updated together.
#[derive(Debug)]
pub struct Principal {
    pub id: PrincipalId,
    pub codes: HashMap<String, Identifier>,
}

impl Principal {
    /// Creates a principal with an empty index.
    pub fn new(id: PrincipalId) -> Self {
        Self {
            id,
            codes: HashMap::new(),
        }
    }
}
