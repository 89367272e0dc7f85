//! `energy-exporters` library crate.
//!
//! The binary (`elering-price-exporter`) is a thin wrapper around this
//! library so that:
//!
//! - each pipeline stage is testable without spawning processes
//! - further exporters can reuse the InfluxDB sink and file writers

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod frame;
pub mod influx;
pub mod io;
pub mod logging;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
