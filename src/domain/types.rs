//! Shared domain types.
//!
//! Prices arrive grouped by bidding area and leave as flat, long-format
//! records. Both shapes live here so the fetch, transform, and sink stages
//! agree on them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Deserialize;

/// A single price observation as returned by the price API.
///
/// `timestamp` is unix seconds (start of the delivery period).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PricePoint {
    pub timestamp: i64,
    pub price: f64,
}

/// Price series keyed by bidding area code (e.g. `EE`, `FI`).
///
/// A `BTreeMap` keeps the area order stable (ascending code) regardless of
/// the order the upstream JSON happened to use.
pub type AreaPrices = BTreeMap<String, Vec<PricePoint>>;

/// One row of the long-format price table.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub time: DateTime<Utc>,
    pub area: String,
    /// `None` when the area has no price for a timestamp that another area has.
    pub value: Option<f64>,
}

/// Log verbosity accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
    /// There is no level above `error` in `tracing`; critical messages are
    /// emitted as errors.
    #[value(name = "CRITICAL")]
    Critical,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    pub fn filter_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}
