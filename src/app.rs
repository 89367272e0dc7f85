//! Top-level application orchestration.
//!
//! `src/main.rs` only maps the result to an exit code; this module:
//! - loads `.env` and parses CLI arguments
//! - installs logging and error reporting
//! - runs the export pipeline

use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

use crate::app::pipeline::{ExportConfig, RunOutput};
use crate::cli::Cli;
use crate::error::AppError;
use crate::influx::InfluxConfig;

pub mod pipeline;

/// Entry point for the `elering-price-exporter` binary.
pub fn run() -> Result<(), AppError> {
    // Before parsing, so `.env` values feed clap's env fallbacks.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    crate::logging::init(cli.log);
    let _sentry = match crate::telemetry::init(
        cli.sentry.sentry_dsn.as_deref(),
        cli.sentry.sentry_environment.as_deref(),
    ) {
        Ok(guard) => guard,
        Err(err) => {
            error!("{err}");
            return Err(err);
        }
    };

    let result = export_config_from_cli(&cli).and_then(|config| pipeline::run_export(&config, Utc::now()));
    conclude(result)
}

/// Log the outcome of a run; failures are also sent to Sentry.
pub fn conclude(result: Result<RunOutput, AppError>) -> Result<(), AppError> {
    match result {
        Ok(out) => {
            info!(
                rows = out.frame.len(),
                files = out.exports.len(),
                influx_lines = out.influx.map(|s| s.lines).unwrap_or(0),
                "export finished"
            );
            Ok(())
        }
        Err(err) => {
            error!("{err}");
            crate::telemetry::report_error(&err);
            Err(err)
        }
    }
}

pub fn export_config_from_cli(cli: &Cli) -> Result<ExportConfig, AppError> {
    let influx = if cli.influx.skip_influxdb {
        None
    } else {
        Some(InfluxConfig::resolve(
            cli.influx.influxdb_url.clone(),
            cli.influx.influxdb_token.clone(),
            cli.influx.influxdb_org.clone(),
            cli.influx.influxdb_bucket.clone(),
        )?)
    };

    let measurement = cli.influxdb_measurement.trim();
    if measurement.is_empty() || cli.influxdb_measurement.contains(['\n', '\r']) {
        return Err(AppError::usage(
            "InfluxDB measurement name must be non-empty and on a single line.",
        ));
    }

    Ok(ExportConfig {
        window: cli.window_selector(),
        elering_url: cli.elering_url.clone(),
        measurement: measurement.to_string(),
        output_files: cli.output_filename.clone(),
        influx,
        timeout: Duration::from_secs(cli.timeout_secs.max(1)),
    })
}
