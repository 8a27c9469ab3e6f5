// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Count Firebase App Distribution releases by build version or build name.

pub mod api;
pub mod commands;
pub mod config;
pub mod counter;
pub mod dispatch;
pub mod error;
pub mod release;
