//! Wide-to-long price table.
//!
//! The upstream payload is one series per area. Downstream sinks want one
//! row per `(time, area)`, so the transform is:
//!
//! 1. pivot to a wide table indexed by the union of all timestamps
//! 2. melt back, area by area, keeping gaps as missing values

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use polars::prelude::*;

use crate::domain::{AreaPrices, PriceRecord, format_api_timestamp};
use crate::error::AppError;

pub const TIME_COLUMN: &str = "time";
pub const AREA_COLUMN: &str = "area";
pub const VALUE_COLUMN: &str = "value";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceFrame {
    pub records: Vec<PriceRecord>,
}

impl PriceFrame {
    pub fn from_area_prices(prices: &AreaPrices) -> Result<Self, AppError> {
        let mut index: BTreeSet<i64> = BTreeSet::new();
        let mut columns: BTreeMap<&str, BTreeMap<i64, f64>> = BTreeMap::new();

        for (area, points) in prices {
            let column = columns.entry(area.as_str()).or_default();
            for p in points {
                index.insert(p.timestamp);
                column.insert(p.timestamp, p.price);
            }
        }

        let times: Vec<(i64, DateTime<Utc>)> = index
            .into_iter()
            .map(|ts| {
                DateTime::from_timestamp(ts, 0)
                    .map(|t| (ts, t))
                    .ok_or_else(|| AppError::upstream(format!("Price timestamp {ts} is out of range.")))
            })
            .collect::<Result<_, _>>()?;

        let mut records = Vec::with_capacity(times.len() * columns.len());
        for (area, column) in &columns {
            for (ts, time) in &times {
                records.push(PriceRecord {
                    time: *time,
                    area: (*area).to_string(),
                    value: column.get(ts).copied(),
                });
            }
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct area codes, in row order.
    pub fn areas(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.records {
            if !out.contains(&r.area.as_str()) {
                out.push(r.area.as_str());
            }
        }
        out
    }

    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.records.iter().map(|r| r.time).min()?;
        let last = self.records.iter().map(|r| r.time).max()?;
        Some((first, last))
    }

    pub fn summary(&self) -> String {
        match self.time_range() {
            Some((first, last)) => format!(
                "{} rows, areas [{}], {} .. {}",
                self.len(),
                self.areas().join(", "),
                format_api_timestamp(first),
                format_api_timestamp(last)
            ),
            None => "0 rows".to_string(),
        }
    }

    /// Columnar view: `time` (UTC, ms), `area`, `value` (nullable).
    pub fn to_dataframe(&self) -> Result<DataFrame, AppError> {
        let times: Vec<i64> = self.records.iter().map(|r| r.time.timestamp_millis()).collect();
        let areas: Vec<&str> = self.records.iter().map(|r| r.area.as_str()).collect();
        let values: Vec<Option<f64>> = self.records.iter().map(|r| r.value).collect();

        let time = Series::new(TIME_COLUMN.into(), times)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, Some(TimeZone::UTC)))
            .map_err(|e| AppError::usage(format!("Failed to build time column: {e}")))?;

        let cols: Vec<Column> = vec![
            time.into(),
            Series::new(AREA_COLUMN.into(), areas).into(),
            Series::new(VALUE_COLUMN.into(), values).into(),
        ];

        DataFrame::new(cols).map_err(|e| AppError::usage(format!("Failed to build price table: {e}")))
    }
}
