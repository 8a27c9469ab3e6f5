// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Release records and the identifiers used to look them up.

use crate::error::CountError;
use serde::Deserialize;
use std::fmt;

/// A release as returned by the App Distribution API.
///
/// Every field is optional on the wire. A missing field never matches a
/// target value.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_version: Option<String>,
    #[serde(default)]
    pub build_version: Option<String>,
    #[serde(default)]
    pub build_name: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub release_notes: Option<ReleaseNotes>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ReleaseNotes {
    #[serde(default)]
    pub text: Option<String>,
}

/// One page of a release listing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub releases: Vec<Release>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl Page {
    /// The token for the following page, if any. An empty token ends the listing.
    pub fn next_token(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// Which release field a count compares against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseField {
    BuildVersion,
    BuildName,
}

impl ReleaseField {
    pub fn value<'a>(&self, release: &'a Release) -> Option<&'a str> {
        match self {
            ReleaseField::BuildVersion => release.build_version.as_deref(),
            ReleaseField::BuildName => release.build_name.as_deref(),
        }
    }

    /// The field's name as the API spells it.
    pub fn api_name(&self) -> &'static str {
        match self {
            ReleaseField::BuildVersion => "buildVersion",
            ReleaseField::BuildName => "buildName",
        }
    }
}

impl fmt::Display for ReleaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// A non-blank value to match a release field against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchTarget(String);

impl MatchTarget {
    /// Rejects empty and whitespace-only values. The value is kept as given,
    /// untrimmed, since matching is exact.
    pub fn new(field: ReleaseField, value: impl Into<String>) -> Result<Self, CountError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CountError::invalid_argument(format!(
                "you must provide a non-empty {}",
                field
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Firebase app id, e.g. `1:1234567890:android:0a1b2c3d4e5f`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppId {
    id: String,
    project_number: String,
}

impl AppId {
    pub fn parse(id: &str) -> Result<Self, CountError> {
        let id = id.trim();
        let mut parts = id.split(':');
        let project_number = match (parts.next(), parts.next()) {
            (Some(_), Some(number))
                if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) =>
            {
                number
            }
            _ => {
                return Err(CountError::invalid_argument(format!(
                    "'{}' is not a valid Firebase app id (expected 1:<project number>:<platform>:<hash>)",
                    id
                )));
            }
        };

        Ok(Self {
            id: id.to_string(),
            project_number: project_number.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn project_number(&self) -> &str {
        &self.project_number
    }

    /// The parent resource that owns this app's releases.
    pub fn parent(&self) -> String {
        format!("projects/{}/apps/{}", self.project_number, self.id)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
