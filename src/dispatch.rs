// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing and command dispatch.

use crate::{
    commands::{self, OutputFormat},
    config::{Config, Overrides},
    release::ReleaseField,
};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;

const DEFAULT_CONFIG_PATH: &str = "release-count.toml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file [default: release-count.toml, if present]
    #[arg(short, long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Firebase App ID, as shown on the console's General Settings page
    #[arg(short, long, env = "FIREBASEAPPDISTRO_APP", global = true)]
    app: Option<String>,

    /// OAuth access token for the App Distribution API
    #[arg(long, env = "FIREBASE_ACCESS_TOKEN", hide_env_values = true, global = true)]
    access_token: Option<String>,

    /// Base URL of the App Distribution API
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Number of releases to request per page
    #[arg(long, global = true)]
    page_size: Option<u32>,

    /// Give up if the listing has not ended after this many pages
    #[arg(long, global = true)]
    max_pages: Option<usize>,

    /// Print verbose debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Count releases with the given build version
    BuildVersion {
        /// The buildVersion to count releases for
        value: String,
    },

    /// Count releases with the given build name
    BuildName {
        /// The buildName to count releases for
        value: String,
    },
}

/// Parse arguments and dispatch to the appropriate command.
pub async fn dispatch() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let (field, value) = match &args.command {
        Command::BuildVersion { value } => (ReleaseField::BuildVersion, value.as_str()),
        Command::BuildName { value } => (ReleaseField::BuildName, value.as_str()),
    };

    let config = match &args.config {
        Some(path) => Config::load_or_default(path, true),
        None => Config::load_or_default(Utf8Path::new(DEFAULT_CONFIG_PATH), false),
    }
    .context("failed to load configuration")?;

    let settings = config.resolve(Overrides {
        app: args.app.clone(),
        access_token: args.access_token.clone(),
        api_base: args.api_base.clone(),
        page_size: args.page_size,
        max_pages: args.max_pages,
    })?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    commands::run_count(&settings, field, value, format).await?;

    Ok(())
}

fn init_logging(debug: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // A second init (e.g. from tests) is harmless.
    let _ = builder.try_init();
}
