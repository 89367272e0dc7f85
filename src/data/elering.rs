//! Elering dashboard API integration for Nord Pool day-ahead prices.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{AreaPrices, PricePoint, TimeWindow, format_api_timestamp};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://dashboard.elering.ee";
const PRICE_PATH: &str = "/api/nps/price";

/// Raw `/api/nps/price` payload.
///
/// Area keys are lowercase upstream (`ee`, `fi`, `lt`, `lv`).
#[derive(Debug, Clone, Deserialize)]
pub struct PriceResponse {
    pub success: bool,
    #[serde(default)]
    pub data: BTreeMap<String, Vec<PricePoint>>,
}

impl PriceResponse {
    /// Upper-case the area codes. Keys that collide after folding are merged.
    pub fn into_area_prices(self) -> AreaPrices {
        let mut out = AreaPrices::new();
        for (area, points) in self.data {
            out.entry(area.to_uppercase()).or_default().extend(points);
        }
        out
    }
}

pub struct EleringClient {
    client: Client,
    base_url: String,
}

impl EleringClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::usage(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn fetch_prices(&self, window: &TimeWindow) -> Result<PriceResponse, AppError> {
        let url = format!("{}{PRICE_PATH}", self.base_url);
        let start = format_api_timestamp(window.start);
        let end = format_api_timestamp(window.end);
        debug!(%url, %start, %end, "requesting electricity prices");

        let resp = self
            .client
            .get(&url)
            .query(&[("start", start.as_str()), ("end", end.as_str())])
            .send()
            .map_err(|e| AppError::upstream(format!("Elering request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::upstream(format!(
                "Elering request failed with status {}.",
                resp.status()
            )));
        }

        let body: PriceResponse = resp
            .json()
            .map_err(|e| AppError::upstream(format!("Failed to parse Elering response: {e}")))?;

        debug!(
            success = body.success,
            areas = body.data.len(),
            "received price payload"
        );
        Ok(body)
    }
}
