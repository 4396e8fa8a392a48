//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the console
//! starts.
//!
//! ## Variables
//!
//! - `MAX_LINK_LIFETIME_SECONDS` - Ceiling for a link's TTL (default: 86400)
//! - `MAX_CLICK_LIMIT` - Ceiling for a link's click limit (default: 10000)
//! - `DEFAULT_LINK_LIFETIME_SECONDS` - Optional prompt default for the console
//! - `DEFAULT_CLICK_LIMIT` - Optional prompt default for the console
//! - `RUST_LOG` - Log level (default: `info`)
//!
//! The core service consumes only the [`Limits`] slice; the `DEFAULT_*`
//! values exist for the front end and are never applied by the core.

use anyhow::Result;
use std::env;

/// Ceilings the service clamps requested limits against.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_link_lifetime_seconds: u64,
    pub max_click_limit: u64,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum TTL a link may be created or updated with, in seconds.
    pub max_link_lifetime_seconds: u64,
    /// Maximum click limit a link may be created or updated with.
    pub max_click_limit: u64,
    /// Prompt default for the console's TTL question, when set.
    pub default_link_lifetime_seconds: Option<u64>,
    /// Prompt default for the console's click-limit question, when set.
    pub default_click_limit: Option<u64>,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let max_link_lifetime_seconds = env::var("MAX_LINK_LIFETIME_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let max_click_limit = env::var("MAX_CLICK_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        let default_link_lifetime_seconds = env::var("DEFAULT_LINK_LIFETIME_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok());

        let default_click_limit = env::var("DEFAULT_CLICK_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok());

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            max_link_lifetime_seconds,
            max_click_limit,
            default_link_lifetime_seconds,
            default_click_limit,
            log_level,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either ceiling is zero or a prompt default
    /// exceeds its ceiling.
    pub fn validate(&self) -> Result<()> {
        if self.max_link_lifetime_seconds == 0 {
            anyhow::bail!("MAX_LINK_LIFETIME_SECONDS must be positive");
        }

        if self.max_click_limit == 0 {
            anyhow::bail!("MAX_CLICK_LIMIT must be positive");
        }

        if let Some(default_ttl) = self.default_link_lifetime_seconds
            && (default_ttl == 0 || default_ttl > self.max_link_lifetime_seconds)
        {
            anyhow::bail!(
                "DEFAULT_LINK_LIFETIME_SECONDS must be between 1 and {}, got {}",
                self.max_link_lifetime_seconds,
                default_ttl
            );
        }

        if let Some(default_clicks) = self.default_click_limit
            && (default_clicks == 0 || default_clicks > self.max_click_limit)
        {
            anyhow::bail!(
                "DEFAULT_CLICK_LIMIT must be between 1 and {}, got {}",
                self.max_click_limit,
                default_clicks
            );
        }

        Ok(())
    }

    /// The plain-value slice the core service consumes.
    pub fn limits(&self) -> Limits {
        Limits {
            max_link_lifetime_seconds: self.max_link_lifetime_seconds,
            max_click_limit: self.max_click_limit,
        }
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env();
    config.validate()?;
    Ok(config)
}
