//! Configuration types for pixabay-sampler

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
///
/// Every field has a sensible default; only the API key must be supplied.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pixabay API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Sampling engine settings
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Validate the configuration, returning a [`Error::Config`] naming the
    /// offending key on failure
    pub fn validate(&self) -> Result<()> {
        if self.api.key.is_empty() {
            return Err(Error::Config {
                message: "Pixabay API key must not be empty".to_string(),
                key: Some("api.key".to_string()),
            });
        }
        if self.sampling.colors.is_empty() {
            return Err(Error::Config {
                message: "at least one color must be configured".to_string(),
                key: Some("sampling.colors".to_string()),
            });
        }
        if self.sampling.total_images == 0 {
            return Err(Error::Config {
                message: "total_images must be positive".to_string(),
                key: Some("sampling.total_images".to_string()),
            });
        }
        if self.sampling.per_page == 0 || self.sampling.pages_per_attempt == 0 {
            return Err(Error::Config {
                message: "per_page and pages_per_attempt must be positive".to_string(),
                key: Some("sampling.per_page".to_string()),
            });
        }
        Ok(())
    }
}

/// Pixabay API connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key (default: empty; must be set before use)
    #[serde(default)]
    pub key: String,

    /// Base URL of the search endpoint (default: "https://pixabay.com/api/")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (default: 30s)
    #[serde(default = "default_request_timeout", with = "duration_secs")]
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Sampling engine settings
///
/// Defaults reproduce the constants of the acquisition algorithm: 9 attempts
/// of 3 pages at 200 items per page, backfill restarting at attempt 3, and
/// at most 3 reconciliation rounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Colors to balance the sample across
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,

    /// Global target count across all colors (default: 4000)
    #[serde(default = "default_total_images")]
    pub total_images: usize,

    /// Page size for collection requests (default: 200)
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Number of sequential pages fetched per attempt (default: 3)
    #[serde(default = "default_pages_per_attempt")]
    pub pages_per_attempt: u32,

    /// Maximum parameter-varied attempts per fetcher invocation (default: 9)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Attempt index backfill restarts from, skipping the variants the
    /// initial pass already exhausted (default: 3)
    #[serde(default = "default_backfill_start_attempt")]
    pub backfill_start_attempt: u32,

    /// Maximum dedup/trim/backfill rounds in the reconciliation loop
    /// (default: 3)
    #[serde(default = "default_max_reconcile_rounds")]
    pub max_reconcile_rounds: u32,

    /// Page size for the per-color population probe (default: 3)
    #[serde(default = "default_probe_per_page")]
    pub probe_per_page: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            total_images: default_total_images(),
            per_page: default_per_page(),
            pages_per_attempt: default_pages_per_attempt(),
            max_attempts: default_max_attempts(),
            backfill_start_attempt: default_backfill_start_attempt(),
            max_reconcile_rounds: default_max_reconcile_rounds(),
            probe_per_page: default_probe_per_page(),
        }
    }
}

/// Database settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file path (default: "./images.sqlite")
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_base_url() -> String {
    "https://pixabay.com/api/".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_colors() -> Vec<String> {
    [
        "grayscale",
        "transparent",
        "red",
        "orange",
        "yellow",
        "green",
        "turquoise",
        "blue",
        "lilac",
        "pink",
        "white",
        "gray",
        "black",
        "brown",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_total_images() -> usize {
    4000
}

fn default_per_page() -> u32 {
    200
}

fn default_pages_per_attempt() -> u32 {
    3
}

fn default_max_attempts() -> u32 {
    9
}

fn default_backfill_start_attempt() -> u32 {
    3
}

fn default_max_reconcile_rounds() -> u32 {
    3
}

fn default_probe_per_page() -> u32 {
    3
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./images.sqlite")
}

/// Serialize/deserialize a `Duration` as whole seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_constants() {
        let config = Config::default();
        assert_eq!(config.sampling.max_attempts, 9);
        assert_eq!(config.sampling.pages_per_attempt, 3);
        assert_eq!(config.sampling.per_page, 200);
        assert_eq!(config.sampling.backfill_start_attempt, 3);
        assert_eq!(config.sampling.max_reconcile_rounds, 3);
        assert_eq!(config.sampling.total_images, 4000);
        assert_eq!(config.sampling.colors.len(), 14);
        assert_eq!(config.api.base_url, "https://pixabay.com/api/");
    }

    #[test]
    fn validate_rejects_empty_api_key() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config { ref key, .. } if key.as_deref() == Some("api.key")));
    }

    #[test]
    fn validate_rejects_empty_color_list() {
        let mut config = Config::default();
        config.api.key = "k".to_string();
        config.sampling.colors.clear();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, Error::Config { ref key, .. } if key.as_deref() == Some("sampling.colors"))
        );
    }

    #[test]
    fn validate_rejects_zero_total() {
        let mut config = Config::default();
        config.api.key = "k".to_string();
        config.sampling.total_images = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_deserialization_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"api": {"key": "abc"}}"#).unwrap();
        assert_eq!(config.api.key, "abc");
        assert_eq!(config.sampling.per_page, 200);
        assert_eq!(config.api.request_timeout, Duration::from_secs(30));
        assert_eq!(config.database.path, PathBuf::from("./images.sqlite"));
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = Config::default();
        config.api.key = "abc".to_string();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api.key, "abc");
        assert_eq!(back.sampling.colors, config.sampling.colors);
    }
}
