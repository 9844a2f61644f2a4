//! API Configuration
//!
//! Static settings for the customer service client. A browser bundle has no
//! process environment, so values are baked in at compile time.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

const BASE_URI_VAR: &str = "CUSTOMER_API_BASE_URI";
const DEFAULT_LIMIT_VAR: &str = "CUSTOMER_API_DEFAULT_LIMIT";
const SORT_MIN_VAR: &str = "CUSTOMER_API_SORT_MIN";
const SORT_MAX_VAR: &str = "CUSTOMER_API_SORT_MAX";
const DEBOUNCE_MS_VAR: &str = "CUSTOMER_API_DEBOUNCE_MS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("base URI {0:?} is not an absolute http(s) URL")]
    InvalidBaseUri(String),

    #[error("sort page size range is empty: sortMin {min} > sortMax {max}")]
    EmptyRange { min: u32, max: u32 },
}

/// Customer service settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    pub base_uri: String,
    /// Result cap for searches and page size for the sort view
    pub default_limit: u32,
    pub sort_min: u32,
    pub sort_max: u32,
    /// Quiescence window before a query parameter change is fetched
    pub debounce_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://localhost:8080".to_string(),
            default_limit: 20,
            sort_min: 1,
            sort_max: 100,
            debounce_ms: 50,
        }
    }
}

impl ApiConfig {
    /// Load from variables captured by `option_env!` when the bundle was built
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| {
            let value = match key {
                BASE_URI_VAR => option_env!("CUSTOMER_API_BASE_URI"),
                DEFAULT_LIMIT_VAR => option_env!("CUSTOMER_API_DEFAULT_LIMIT"),
                SORT_MIN_VAR => option_env!("CUSTOMER_API_SORT_MIN"),
                SORT_MAX_VAR => option_env!("CUSTOMER_API_SORT_MAX"),
                DEBOUNCE_MS_VAR => option_env!("CUSTOMER_API_DEBOUNCE_MS"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    /// Load from an arbitrary key lookup, falling back to defaults for unset keys
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            base_uri: lookup(BASE_URI_VAR).unwrap_or_else(|| {
                log::info!("{BASE_URI_VAR} not set, using default: {}", defaults.base_uri);
                defaults.base_uri.clone()
            }),
            default_limit: try_load(&lookup, DEFAULT_LIMIT_VAR, defaults.default_limit)?,
            sort_min: try_load(&lookup, SORT_MIN_VAR, defaults.sort_min)?,
            sort_max: try_load(&lookup, SORT_MAX_VAR, defaults.sort_max)?,
            debounce_ms: try_load(&lookup, DEBOUNCE_MS_VAR, defaults.debounce_ms)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        if self.sort_min > self.sort_max {
            return Err(ConfigError::EmptyRange {
                min: self.sort_min,
                max: self.sort_max,
            });
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let invalid = || ConfigError::InvalidBaseUri(self.base_uri.clone());
        let url = Url::parse(&self.base_uri).map_err(|_| invalid())?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        Ok(url)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Clamp a requested page size into `[sort_min, sort_max]`
    pub fn clamp_page_size(&self, n: u32) -> u32 {
        n.max(self.sort_min).min(self.sort_max)
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
{
    match lookup(key) {
        None => {
            log::info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw.trim().parse().map_err(|_| {
            log::warn!("Invalid {key} value: {raw:?}");
            ConfigError::InvalidNumber { key, value: raw }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ApiConfig::from_vars(lookup(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.debounce(), Duration::from_millis(50));
    }

    #[test]
    fn test_overrides_from_vars() {
        let config = ApiConfig::from_vars(lookup(&[
            ("CUSTOMER_API_BASE_URI", "https://api.example.com/v1"),
            ("CUSTOMER_API_DEFAULT_LIMIT", "15"),
            ("CUSTOMER_API_SORT_MAX", " 40 "),
        ]))
        .unwrap();
        assert_eq!(config.base_uri, "https://api.example.com/v1");
        assert_eq!(config.default_limit, 15);
        assert_eq!(config.sort_min, 1);
        assert_eq!(config.sort_max, 40);
    }

    #[test]
    fn test_rejects_bad_number() {
        let err = ApiConfig::from_vars(lookup(&[("CUSTOMER_API_SORT_MIN", "-3")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: "CUSTOMER_API_SORT_MIN",
                value: "-3".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = ApiConfig::from_vars(lookup(&[
            ("CUSTOMER_API_SORT_MIN", "50"),
            ("CUSTOMER_API_SORT_MAX", "10"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::EmptyRange { min: 50, max: 10 });
    }

    #[test]
    fn test_rejects_relative_or_opaque_base() {
        for bad in ["/customers", "mailto:someone@example.com", "ftp://example.com"] {
            let config = ApiConfig {
                base_uri: bad.to_string(),
                ..ApiConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUri(_))), "{bad}");
        }
    }

    #[test]
    fn test_clamp_page_size() {
        let config = ApiConfig::default();
        assert_eq!(config.clamp_page_size(0), 1);
        assert_eq!(config.clamp_page_size(1_000_000), 100);
        assert_eq!(config.clamp_page_size(42), 42);
    }

    #[test]
    fn test_deserializes_partial_json() {
        let config: ApiConfig = serde_json::from_str(r#"{"baseUri": "http://backend:9000", "sortMax": 25}"#).unwrap();
        assert_eq!(config.base_uri, "http://backend:9000");
        assert_eq!(config.sort_max, 25);
        assert_eq!(config.default_limit, 20);
    }
}
