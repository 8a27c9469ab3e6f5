// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Firebase App Distribution API client for listing releases.

use crate::{
    counter::ReleaseSource,
    error::CountError,
    release::{AppId, Page},
};
use anyhow::anyhow;
use reqwest::StatusCode;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://firebaseappdistribution.googleapis.com";

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

const USER_AGENT: &str = concat!("release-count/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    pub access_token: String,
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, CountError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|err| CountError::upstream("failed to build HTTP client", err))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            access_token: settings.access_token,
        })
    }

    fn releases_request(
        &self,
        parent: &str,
        page_size: u32,
        token: Option<&str>,
    ) -> reqwest::Result<reqwest::Request> {
        let url = format!("{}/v1/{}/releases", self.base_url, parent);

        let mut builder = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .query(&[("pageSize", page_size.to_string())]);
        if let Some(token) = token {
            builder = builder.query(&[("pageToken", token)]);
        }

        builder.build()
    }

    /// Fetch a single page of releases under `parent`.
    ///
    /// `page_number` is only used to make error messages easier to follow.
    pub async fn list_releases_page(
        &self,
        parent: &str,
        page_size: u32,
        token: Option<&str>,
        page_number: usize,
    ) -> Result<Page, CountError> {
        let context = || format!("failed to fetch releases page {} for {}", page_number, parent);

        let request = self
            .releases_request(parent, page_size, token)
            .map_err(|err| CountError::upstream(context(), err))?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| CountError::upstream(context(), err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CountError::upstream(context(), status_error(status, &body)));
        }

        response
            .json::<Page>()
            .await
            .map_err(|err| {
                CountError::upstream(
                    format!("failed to parse releases page {} for {}", page_number, parent),
                    err,
                )
            })
    }
}

fn status_error(status: StatusCode, body: &str) -> anyhow::Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => anyhow!(
            "App Distribution API rejected the credentials with status {}: {}",
            status,
            body
        ),
        StatusCode::NOT_FOUND => anyhow!(
            "App Distribution API returned {}; check that the app id is correct: {}",
            status,
            body
        ),
        _ => anyhow!(
            "App Distribution API request failed with status {}: {}",
            status,
            body
        ),
    }
}

/// The releases of one app, listed through an [`ApiClient`].
#[derive(Debug)]
pub struct ReleasesForApp<'a> {
    client: &'a ApiClient,
    parent: String,
    page_size: u32,
    pages_fetched: usize,
}

impl<'a> ReleasesForApp<'a> {
    pub fn new(client: &'a ApiClient, app: &AppId, page_size: u32) -> Result<Self, CountError> {
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(CountError::invalid_argument(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }

        Ok(Self {
            client,
            parent: app.parent(),
            page_size,
            pages_fetched: 0,
        })
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl ReleaseSource for ReleasesForApp<'_> {
    async fn fetch_page(&mut self, token: Option<&str>) -> Result<Page, CountError> {
        let page_number = self.pages_fetched + 1;
        log::debug!(
            "listing releases page {} of {} (token: {:?})",
            page_number,
            self.parent,
            token
        );

        let page = self
            .client
            .list_releases_page(&self.parent, self.page_size, token, page_number)
            .await?;
        self.pages_fetched = page_number;

        log::debug!(
            "page {} returned {} releases, more pages: {}",
            page_number,
            page.releases.len(),
            page.next_token().is_some()
        );
        Ok(page)
    }
}
