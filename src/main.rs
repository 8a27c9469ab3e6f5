// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Count Firebase App Distribution releases by build version or build name.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    release_count::dispatch::dispatch().await
}
