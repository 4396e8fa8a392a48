//! Application services.

pub mod shortener_service;

pub use shortener_service::{LinkSnapshot, ShortenerService, SHORT_URL_PREFIX};
