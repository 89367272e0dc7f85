//! The export pipeline:
//! window -> Elering fetch -> long-format frame -> files -> InfluxDB
//!
//! `run_with_response` covers everything after the network fetch so the
//! transform and sink stages can run against a canned payload.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::data::{EleringClient, PriceResponse};
use crate::domain::{TimeWindow, WindowSelector, format_api_timestamp, resolve_window};
use crate::error::AppError;
use crate::frame::PriceFrame;
use crate::influx::{InfluxConfig, WriteSummary};
use crate::io::ExportOutcome;

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub window: WindowSelector,
    pub elering_url: String,
    pub measurement: String,
    pub output_files: Vec<PathBuf>,
    /// `None` disables the InfluxDB stage.
    pub influx: Option<InfluxConfig>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub window: TimeWindow,
    pub frame: PriceFrame,
    pub exports: Vec<ExportOutcome>,
    pub influx: Option<WriteSummary>,
}

pub fn run_export(config: &ExportConfig, now: DateTime<Utc>) -> Result<RunOutput, AppError> {
    let window = resolve_window(&config.window, now)?;
    info!(
        "Fetching prices {} .. {}",
        format_api_timestamp(window.start),
        format_api_timestamp(window.end)
    );

    let client = EleringClient::new(&config.elering_url, config.timeout)?;
    let response = client.fetch_prices(&window)?;

    run_with_response(config, window, response)
}

pub fn run_with_response(
    config: &ExportConfig,
    window: TimeWindow,
    response: PriceResponse,
) -> Result<RunOutput, AppError> {
    if !response.success {
        return Err(AppError::upstream("Failed to fetch data"));
    }

    let prices = response.into_area_prices();
    let frame = PriceFrame::from_area_prices(&prices)?;
    info!("{}", frame.summary());
    debug!(?frame, "price table");

    let exports = crate::io::save_all(&frame, &config.output_files)?;

    let influx = match &config.influx {
        Some(influx) => Some(crate::influx::write_frame(
            &frame,
            &config.measurement,
            influx.clone(),
            config.timeout,
        )?),
        None => {
            info!("InfluxDB write skipped");
            None
        }
    };

    Ok(RunOutput {
        window,
        frame,
        exports,
        influx,
    })
}
