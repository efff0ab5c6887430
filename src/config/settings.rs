//! Application settings loading from config.toml
//!
//! Settings cover review-link minting, admin session lifetime, and the admin
//! accounts seeded at startup. Every section has defaults, so a missing file
//! still yields a usable configuration.

use crate::entities::status::AdminRole;
use crate::errors::{Error, Result};
use chrono::Duration;
use serde::Deserialize;
use std::path::Path;

/// Longest accepted review link lifetime, ten years.
pub const MAX_REVIEW_TTL_DAYS: i64 = 3650;

/// Longest accepted admin session lifetime, one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Review link settings
    #[serde(default)]
    pub review: ReviewSettings,
    /// Admin session settings
    #[serde(default)]
    pub session: SessionSettings,
    /// Admin accounts to create when missing
    #[serde(default)]
    pub admins: Vec<AdminSeed>,
}

/// Review link minting
#[derive(Debug, Deserialize, Clone)]
pub struct ReviewSettings {
    /// Public site root the review path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// How long a review link stays valid
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

impl ReviewSettings {
    /// Review link lifetime as a duration
    ///
    /// # Errors
    /// Returns [`Error::Config`] when the day count does not fit a duration.
    pub fn ttl(&self) -> Result<Duration> {
        Duration::try_days(self.token_ttl_days).ok_or_else(|| Error::Config {
            message: format!("review.token_ttl_days out of range: {}", self.token_ttl_days),
        })
    }
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_ttl_days: default_token_ttl_days(),
        }
    }
}

/// Admin session lifetime
#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// Hours until an opened session expires
    #[serde(default = "default_session_ttl_hours")]
    pub ttl_hours: i64,
}

impl SessionSettings {
    /// Session lifetime as a duration
    ///
    /// # Errors
    /// Returns [`Error::Config`] when the hour count does not fit a duration.
    pub fn ttl(&self) -> Result<Duration> {
        Duration::try_hours(self.ttl_hours).ok_or_else(|| Error::Config {
            message: format!("session.ttl_hours out of range: {}", self.ttl_hours),
        })
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_hours: default_session_ttl_hours(),
        }
    }
}

/// An admin account seeded at startup
#[derive(Debug, Deserialize, Clone)]
pub struct AdminSeed {
    /// Login name, unique
    pub username: String,
    /// Contact address
    pub email: String,
    /// Privilege level
    #[serde(default)]
    pub role: AdminRole,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

const fn default_token_ttl_days() -> i64 {
    30
}

const fn default_session_ttl_hours() -> i64 {
    24
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A TTL is not positive or exceeds its maximum
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_settings(&contents)
}

/// Parses and validates settings from TOML text
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if !(1..=MAX_REVIEW_TTL_DAYS).contains(&settings.review.token_ttl_days) {
        return Err(Error::Config {
            message: format!("review.token_ttl_days must be between 1 and {MAX_REVIEW_TTL_DAYS}"),
        });
    }
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&settings.session.ttl_hours) {
        return Err(Error::Config {
            message: format!("session.ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}"),
        });
    }

    Ok(settings)
}

/// Loads settings from `GAIHEKI_CONFIG`, or ./config.toml when unset.
///
/// A missing file falls back to defaults; a malformed one is an error.
pub fn load_default_config() -> Result<Settings> {
    let path = std::env::var("GAIHEKI_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::warn!(%path, "Config file not found, using defaults");
        return Ok(Settings::default());
    }
    load_config(path)
}
