// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counting releases across a paginated listing.

use crate::{
    error::CountError,
    release::{MatchTarget, Page, Release, ReleaseField},
};
use anyhow::anyhow;
use std::future::Future;

/// Default upper bound on the number of pages fetched for one count.
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Something that can list releases one page at a time.
///
/// `fetch_page(None)` returns the first page. Passing a page's next token
/// returns the page that follows it.
pub trait ReleaseSource {
    fn fetch_page(
        &mut self,
        token: Option<&str>,
    ) -> impl Future<Output = Result<Page, CountError>> + Send;
}

/// Bounds on how far a single count may page before giving up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLimits {
    max_pages: usize,
}

impl PageLimits {
    pub fn new(max_pages: usize) -> Result<Self, CountError> {
        if max_pages == 0 {
            return Err(CountError::invalid_argument("max pages must be at least 1"));
        }
        Ok(Self { max_pages })
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Fetch every page from `source` and count the releases `predicate` accepts.
///
/// Pages are fetched strictly one after another and filtered as they
/// arrive, so at most one page is held at a time. Records are not
/// deduplicated: a release listed on two pages is counted twice.
///
/// A failed fetch aborts the count and is returned unchanged. Pagination
/// that keeps going past `limits`, or that hands back the token it was just
/// given, is reported as an upstream failure. Only an immediately repeated
/// token is caught directly; a longer cycle such as `A -> B -> A` runs until
/// `limits` is reached.
pub async fn count_matching<S, P>(
    source: &mut S,
    limits: PageLimits,
    predicate: P,
) -> Result<u64, CountError>
where
    S: ReleaseSource,
    P: Fn(&Release) -> bool,
{
    let mut token: Option<String> = None;
    let mut count = 0u64;
    let mut pages = 0usize;

    loop {
        let page = source.fetch_page(token.as_deref()).await?;
        pages += 1;
        count += page.releases.iter().filter(|release| predicate(release)).count() as u64;

        let Some(next) = page.next_token() else {
            return Ok(count);
        };

        if token.as_deref() == Some(next) {
            return Err(CountError::upstream(
                format!("pagination did not terminate after {} pages", pages),
                anyhow!("page token '{}' was returned twice in a row", next),
            ));
        }
        if pages >= limits.max_pages {
            return Err(CountError::upstream(
                format!("pagination did not terminate after {} pages", pages),
                anyhow!("page limit of {} reached", limits.max_pages),
            ));
        }

        token = Some(next.to_string());
    }
}

/// Count the releases whose `field` equals `target` exactly.
pub async fn count_by_field<S: ReleaseSource>(
    source: &mut S,
    field: ReleaseField,
    target: &MatchTarget,
    limits: PageLimits,
) -> Result<u64, CountError> {
    count_matching(source, limits, |release| {
        field.value(release) == Some(target.as_str())
    })
    .await
}

/// Count the releases with the given build version.
///
/// Blank values are rejected before anything is fetched.
pub async fn count_by_build_version<S: ReleaseSource>(
    source: &mut S,
    build_version: &str,
    limits: PageLimits,
) -> Result<u64, CountError> {
    let target = MatchTarget::new(ReleaseField::BuildVersion, build_version)?;
    count_by_field(source, ReleaseField::BuildVersion, &target, limits).await
}

/// Count the releases with the given build name.
///
/// Blank values are rejected before anything is fetched.
pub async fn count_by_build_name<S: ReleaseSource>(
    source: &mut S,
    build_name: &str,
    limits: PageLimits,
) -> Result<u64, CountError> {
    let target = MatchTarget::new(ReleaseField::BuildName, build_name)?;
    count_by_field(source, ReleaseField::BuildName, &target, limits).await
}
