// SPDX-License-Identifier: MIT

//! Client configuration
//!
//! Values come from an optional YAML file first; anything the file leaves
//! unset is read from the environment (`PORTAL_*`, `.env` honored by `main`).

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{PortalError, Result};

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Root of the REST API, e.g. `https://portal.example.com/api`
    #[serde(default)]
    pub base_url: String,
    /// Sent as `Accept-Language`
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl PortalConfig {
    /// Read everything from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load a YAML file, then fill gaps from the environment
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        config.fill_from(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    pub fn parse_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Build from an arbitrary key lookup; `from_env` passes `std::env::var`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.fill_from(lookup);
        config.validate()?;
        Ok(config)
    }

    fn fill_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.base_url.trim().is_empty() {
            if let Some(url) = non_empty("PORTAL_BASE_URL") {
                self.base_url = url;
            }
        }
        if self.locale.is_none() {
            self.locale = non_empty("PORTAL_LOCALE");
        }
        if self.token.is_none() {
            self.token = non_empty("PORTAL_TOKEN");
        }
        if self.refresh_token.is_none() {
            self.refresh_token = non_empty("PORTAL_REFRESH_TOKEN");
        }
        if self.timeout_secs.is_none() {
            match non_empty("PORTAL_TIMEOUT_SECS").map(|v| v.trim().parse::<u64>()) {
                Some(Ok(secs)) => self.timeout_secs = Some(secs),
                Some(Err(_)) => log::warn!("Ignoring invalid PORTAL_TIMEOUT_SECS"),
                None => {}
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(PortalError::config("PORTAL_BASE_URL must be set"));
        }
        url::Url::parse(&self.base_url)?;
        Ok(())
    }

    /// Locale to send, lower-cased, defaulting to `en`
    pub fn locale(&self) -> String {
        self.locale
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCALE)
            .to_lowercase()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
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
    fn test_from_lookup_reads_all_values() {
        let config = PortalConfig::from_lookup(lookup(&[
            ("PORTAL_BASE_URL", "https://portal.example.com/api"),
            ("PORTAL_LOCALE", "AR"),
            ("PORTAL_TOKEN", "tok"),
            ("PORTAL_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://portal.example.com/api");
        assert_eq!(config.locale(), "ar");
        assert_eq!(config.token.as_deref(), Some("tok"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.refresh_token.is_none());
    }

    #[test]
    fn test_missing_base_url_is_config_error() {
        let err = PortalConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, PortalError::Config(_)));
    }

    #[test]
    fn test_locale_defaults_to_en() {
        let config =
            PortalConfig::from_lookup(lookup(&[("PORTAL_BASE_URL", "http://localhost:5000")]))
                .unwrap();
        assert_eq!(config.locale(), "en");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_yaml_values_win_over_environment() {
        let mut config = PortalConfig::parse_yaml(
            r#"
base_url: "https://file.example.com"
locale: ar
"#,
        )
        .unwrap();
        config.fill_from(lookup(&[
            ("PORTAL_BASE_URL", "https://env.example.com"),
            ("PORTAL_LOCALE", "en"),
            ("PORTAL_TOKEN", "env-token"),
        ]));

        assert_eq!(config.base_url, "https://file.example.com");
        assert_eq!(config.locale(), "ar");
        assert_eq!(config.token.as_deref(), Some("env-token"));
    }
}
