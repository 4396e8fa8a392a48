//! Domain layer: entities, the clock seam, and the in-memory store.

pub mod clock;
pub mod entities;
pub mod store;
