// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command implementations.

use crate::{
    api::{ApiClient, ReleasesForApp},
    config::Settings,
    counter,
    release::{MatchTarget, ReleaseField},
};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// The result of one count, as printed with `--json`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CountReport {
    pub app: String,
    pub field: &'static str,
    pub value: String,
    pub count: u64,
}

/// Run the count command for `field`, returning the number of matching releases.
pub async fn run_count(
    settings: &Settings,
    field: ReleaseField,
    value: &str,
    format: OutputFormat,
) -> Result<u64> {
    // Validate before touching the network.
    let target = MatchTarget::new(field, value)?;

    if format == OutputFormat::Human {
        println!(
            "Counting releases with {}={} for app {}...",
            field, target, settings.app
        );
    }

    let client = ApiClient::new(settings.api.clone())?;
    let mut source = ReleasesForApp::new(&client, &settings.app, settings.page_size)?;

    let count = counter::count_by_field(&mut source, field, &target, settings.limits)
        .await
        .with_context(|| format!("failed to count releases for app {}", settings.app))?;

    log::debug!(
        "scanned {} pages for app {}",
        source.pages_fetched(),
        settings.app
    );

    let report = CountReport {
        app: settings.app.to_string(),
        field: field.api_name(),
        value: target.to_string(),
        count,
    };
    print_report(&report, format)?;

    Ok(count)
}

fn print_report(report: &CountReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            println!(
                "Found {} {} with {}={}.",
                report.count,
                if report.count == 1 { "release" } else { "releases" },
                report.field,
                report.value
            );
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).context("failed to serialize count report")?;
            println!("{}", json);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Overrides};

    fn settings() -> Settings {
        Config::default()
            .resolve(Overrides {
                app: Some("1:123:android:abc".to_string()),
                access_token: Some("token".to_string()),
                // Nothing listens here; the tests below must fail before connecting.
                api_base: Some("http://127.0.0.1:9".to_string()),
                ..Default::default()
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_blank_value_rejected() {
        let err = run_count(&settings(), ReleaseField::BuildVersion, " ", OutputFormat::Json)
            .await
            .unwrap_err();

        let count_err = err
            .downcast_ref::<crate::error::CountError>()
            .expect("should be a CountError");
        assert!(count_err.is_invalid_argument());
    }

    #[test]
    fn test_report_json() {
        let report = CountReport {
            app: "1:123:android:abc".to_string(),
            field: ReleaseField::BuildName.api_name(),
            value: "nightly".to_string(),
            count: 3,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "app": "1:123:android:abc",
                "field": "buildName",
                "value": "nightly",
                "count": 3,
            })
        );
    }
}
