//! InfluxDB v2 sink.
//!
//! - connection settings (`InfluxConfig`)
//! - line protocol encoding (`line_protocol`)
//! - HTTP write client (`writer`)

use std::time::Duration;

use tracing::{debug, info};

use crate::error::AppError;
use crate::frame::PriceFrame;

pub mod line_protocol;
pub mod writer;

pub use line_protocol::{encode_frame, encode_record};
pub use writer::{BATCH_SIZE, InfluxWriter, WriteSummary};

#[derive(Clone, PartialEq, Eq)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
}

impl InfluxConfig {
    /// Build a config from optional CLI/env values. Empty strings count as missing.
    pub fn resolve(
        url: Option<String>,
        token: Option<String>,
        org: Option<String>,
        bucket: Option<String>,
    ) -> Result<Self, AppError> {
        let config = Self {
            url: required(url, "INFLUXDB_URL")?,
            token: required(token, "INFLUXDB_TOKEN")?,
            org: required(org, "INFLUXDB_ORG")?,
            bucket: required(bucket, "INFLUXDB_BUCKET")?,
        };
        info!(
            "Got InfluxDB parameters url={}, token=*****, org={}, bucket={}",
            config.url, config.org, config.bucket
        );
        Ok(config)
    }
}

// Keeps the token out of debug output.
impl std::fmt::Debug for InfluxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfluxConfig")
            .field("url", &self.url)
            .field("token", &"*****")
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .finish()
    }
}

fn required(value: Option<String>, env_name: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::usage(format!(
            "Parameter missing: add --{} or {env_name} environment variable",
            env_name.to_lowercase().replace('_', "-")
        ))),
    }
}

/// Encode the frame and write it to InfluxDB.
pub fn write_frame(
    frame: &PriceFrame,
    measurement: &str,
    config: InfluxConfig,
    timeout: Duration,
) -> Result<WriteSummary, AppError> {
    info!("Write DataFrame into {}/{}/{}", config.url, config.org, config.bucket);

    let lines = encode_frame(frame, measurement);
    for line in &lines {
        debug!("{line}");
    }
    if lines.len() < frame.len() {
        debug!(skipped = frame.len() - lines.len(), "records without a value were not written");
    }

    InfluxWriter::new(config, timeout)?.write_lines(&lines)
}
