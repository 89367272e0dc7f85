//! Upstream data sources.

pub mod elering;

pub use elering::{DEFAULT_BASE_URL, EleringClient, PriceResponse};
