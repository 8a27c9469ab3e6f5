// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for release counting.

use crate::{
    api::{self, ApiSettings},
    counter::{self, PageLimits},
    error::CountError,
    release::AppId,
};
use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::{fs, time::Duration};

/// Settings read from the config file. Every key is optional.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub app: Option<String>,
    pub access_token: Option<String>,
    pub api_base: Option<String>,
    pub page_size: Option<u32>,
    pub max_pages: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub app: Option<String>,
    pub access_token: Option<String>,
    pub api_base: Option<String>,
    pub page_size: Option<u32>,
    pub max_pages: Option<usize>,
}

/// Fully resolved settings for one run.
#[derive(Debug)]
pub struct Settings {
    pub app: AppId,
    pub api: ApiSettings,
    pub page_size: u32,
    pub limits: PageLimits,
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path.as_std_path())
            .with_context(|| format!("failed to read config file at {}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file at {}", path))
    }

    /// Load the file if it exists, otherwise start from an empty config.
    ///
    /// An explicitly requested file that is missing is an error.
    pub fn load_or_default(path: &Utf8Path, explicit: bool) -> Result<Self> {
        if !explicit && !path.as_std_path().exists() {
            log::debug!("no config file at {}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Combine this config with `overrides`, which take precedence.
    pub fn resolve(self, overrides: Overrides) -> Result<Settings> {
        let app = overrides.app.or(self.app).ok_or_else(|| {
            CountError::invalid_argument(
                "missing app id: pass --app, set FIREBASEAPPDISTRO_APP, or add `app` to the config file",
            )
        })?;
        let app = AppId::parse(&app)?;

        let access_token = overrides
            .access_token
            .or(self.access_token)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                CountError::invalid_argument(
                    "missing access token: pass --access-token, set FIREBASE_ACCESS_TOKEN, or add `access_token` to the config file",
                )
            })?;

        let page_size = overrides
            .page_size
            .or(self.page_size)
            .unwrap_or(api::DEFAULT_PAGE_SIZE);
        let max_pages = overrides
            .max_pages
            .or(self.max_pages)
            .unwrap_or(counter::DEFAULT_MAX_PAGES);
        let limits = PageLimits::new(max_pages)?;

        Ok(Settings {
            app,
            api: ApiSettings {
                base_url: overrides
                    .api_base
                    .or(self.api_base)
                    .unwrap_or_else(|| api::DEFAULT_API_BASE.to_string()),
                access_token,
                timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            },
            page_size,
            limits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
app = "1:1234567890:android:abc123"
access_token = "from-file"
api_base = "http://localhost:8080"
page_size = 50
max_pages = 20
timeout_secs = 5
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        let settings = config.resolve(Overrides::default()).unwrap();

        assert_eq!(settings.app.as_str(), "1:1234567890:android:abc123");
        assert_eq!(settings.api.access_token, "from-file");
        assert_eq!(settings.api.base_url, "http://localhost:8080");
        assert_eq!(settings.api.timeout, Duration::from_secs(5));
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.limits.max_pages(), 20);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        let settings = config
            .resolve(Overrides {
                app: Some("1:42:ios:def".to_string()),
                access_token: Some("token".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(settings.api.base_url, api::DEFAULT_API_BASE);
        assert_eq!(settings.page_size, api::DEFAULT_PAGE_SIZE);
        assert_eq!(settings.limits.max_pages(), counter::DEFAULT_MAX_PAGES);
        assert_eq!(settings.api.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config {
            app: Some("1:1:android:file".to_string()),
            access_token: Some("file-token".to_string()),
            page_size: Some(10),
            ..Default::default()
        };

        let settings = config
            .resolve(Overrides {
                app: Some("1:2:android:flag".to_string()),
                access_token: Some("flag-token".to_string()),
                page_size: Some(200),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(settings.app.project_number(), "2");
        assert_eq!(settings.api.access_token, "flag-token");
        assert_eq!(settings.page_size, 200);
    }

    fn is_invalid_argument(err: &anyhow::Error) -> bool {
        err.downcast_ref::<CountError>()
            .is_some_and(CountError::is_invalid_argument)
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            app: Some("1:1234567890:ios:abc123".to_string()),
            page_size: Some(25),
            max_pages: Some(3),
            ..Default::default()
        };
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed.app, config.app);
        assert_eq!(parsed.page_size, Some(25));
        assert_eq!(parsed.max_pages, Some(3));
        assert_eq!(parsed.access_token, None);
    }

    #[test]
    fn test_missing_values() {
        let err = Config::default()
            .resolve(Overrides {
                access_token: Some("token".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.to_string().contains("missing app id"));
        assert!(is_invalid_argument(&err));

        let err = Config::default()
            .resolve(Overrides {
                app: Some("1:1:android:a".to_string()),
                access_token: Some("  ".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.to_string().contains("missing access token"));
        assert!(is_invalid_argument(&err));

        let err = Config::default()
            .resolve(Overrides {
                app: Some("not-an-app-id".to_string()),
                access_token: Some("token".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(is_invalid_argument(&err));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<Config>("build_number = 3").is_err());
    }

    #[test]
    fn test_missing_implicit_file_is_empty_config() {
        let config =
            Config::load_or_default(Utf8Path::new("does-not-exist/release-count.toml"), false)
                .unwrap();
        assert!(config.app.is_none());

        assert!(
            Config::load_or_default(Utf8Path::new("does-not-exist/release-count.toml"), true)
                .is_err()
        );
    }
}
