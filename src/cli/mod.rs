//! Command-line parsing for the Elering price exporter.
//!
//! Parsing stays here; `app` turns the parsed flags into an `ExportConfig`.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser};

use crate::data::DEFAULT_BASE_URL;
use crate::domain::{LogLevel, WindowSelector};

#[derive(Debug, Parser)]
#[command(
    name = "elering-price-exporter",
    version,
    about = "Fetch electricity market prices",
    group(ArgGroup::new("window").args(["start_time", "tomorrow", "today"]))
)]
pub struct Cli {
    /// Start time in ISO format (e.g., 2025-05-07T22:00:00Z).
    #[arg(long, value_name = "ISO")]
    pub start_time: Option<String>,

    /// Fetch prices for tomorrow.
    #[arg(long)]
    pub tomorrow: bool,

    /// Fetch prices for today (from yesterday 22:00 to today 22:00).
    #[arg(long)]
    pub today: bool,

    /// End time in ISO format (e.g., 2025-05-08T23:00:00Z).
    #[arg(long, value_name = "ISO", conflicts_with_all = ["tomorrow", "today"])]
    pub end_time: Option<String>,

    /// InfluxDB measurement name.
    #[arg(long, default_value = "price")]
    pub influxdb_measurement: String,

    /// Output filenames (supported formats: .parquet, .csv, .xlsx).
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub output_filename: Vec<PathBuf>,

    /// Log level.
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Error)]
    pub log: LogLevel,

    /// Price API base URL.
    #[arg(long, env = "ELERING_URL", default_value = DEFAULT_BASE_URL)]
    pub elering_url: String,

    /// HTTP timeout in seconds, applied to both the price API and InfluxDB.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    #[command(flatten)]
    pub influx: InfluxArgs,

    #[command(flatten)]
    pub sentry: SentryArgs,
}

impl Cli {
    pub fn window_selector(&self) -> WindowSelector {
        if self.tomorrow {
            WindowSelector::Tomorrow
        } else if self.today {
            WindowSelector::Today
        } else if let Some(start) = &self.start_time {
            WindowSelector::Range {
                start: start.clone(),
                end: self.end_time.clone(),
            }
        } else {
            WindowSelector::Default {
                end: self.end_time.clone(),
            }
        }
    }
}

/// InfluxDB connection. Each flag falls back to its environment variable.
#[derive(Debug, Clone, Args)]
pub struct InfluxArgs {
    /// InfluxDB url.
    #[arg(long, env = "INFLUXDB_URL")]
    pub influxdb_url: Option<String>,

    /// InfluxDB token.
    #[arg(long, env = "INFLUXDB_TOKEN", hide_env_values = true)]
    pub influxdb_token: Option<String>,

    /// InfluxDB organization.
    #[arg(long, env = "INFLUXDB_ORG")]
    pub influxdb_org: Option<String>,

    /// InfluxDB bucket name.
    #[arg(long, env = "INFLUXDB_BUCKET")]
    pub influxdb_bucket: Option<String>,

    /// Do not write to InfluxDB.
    #[arg(long)]
    pub skip_influxdb: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SentryArgs {
    /// Sentry DSN; error reporting is off when unset.
    #[arg(long, env = "SENTRY_DSN", hide_env_values = true)]
    pub sentry_dsn: Option<String>,

    /// Sentry environment tag.
    #[arg(long, env = "SENTRY_ENVIRONMENT")]
    pub sentry_environment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let mut argv = vec!["elering-price-exporter"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv)
    }

    #[test]
    fn defaults_match_script_behavior() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.influxdb_measurement, "price");
        assert_eq!(cli.log, LogLevel::Error);
        assert!(cli.output_filename.is_empty());
        assert_eq!(cli.window_selector(), WindowSelector::Default { end: None });
    }

    #[test]
    fn window_flags_are_mutually_exclusive() {
        assert!(parse(&["--today", "--tomorrow"]).is_err());
        assert!(parse(&["--start-time", "2025-05-07T22:00:00Z", "--today"]).is_err());
        assert!(parse(&["--tomorrow", "--end-time", "2025-05-08T22:00:00Z"]).is_err());
    }

    #[test]
    fn range_selector_carries_start_and_end() {
        let cli = parse(&[
            "--start-time",
            "2025-05-07T22:00:00Z",
            "--end-time",
            "2025-05-08T22:00:00Z",
        ])
        .unwrap();
        assert_eq!(
            cli.window_selector(),
            WindowSelector::Range {
                start: "2025-05-07T22:00:00Z".to_string(),
                end: Some("2025-05-08T22:00:00Z".to_string()),
            }
        );
    }

    #[test]
    fn relative_selectors() {
        assert_eq!(parse(&["--today"]).unwrap().window_selector(), WindowSelector::Today);
        assert_eq!(parse(&["--tomorrow"]).unwrap().window_selector(), WindowSelector::Tomorrow);
    }

    #[test]
    fn multiple_output_files_and_case_insensitive_log() {
        let cli = parse(&["--output-filename", "a.csv", "b.parquet", "--log", "debug"]).unwrap();
        assert_eq!(
            cli.output_filename,
            vec![PathBuf::from("a.csv"), PathBuf::from("b.parquet")]
        );
        assert_eq!(cli.log, LogLevel::Debug);
    }
}
