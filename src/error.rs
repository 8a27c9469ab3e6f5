// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type for release counting.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CountError {
    /// A caller-supplied value was rejected before any request was made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Fetching a page of releases failed. Never retried.
    #[error("{context}")]
    Upstream {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CountError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn upstream(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Upstream {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
