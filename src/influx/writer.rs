//! Blocking client for the InfluxDB v2 `/api/v2/write` endpoint.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::debug;

use super::InfluxConfig;
use crate::error::AppError;

/// Upper bound on lines per request.
pub const BATCH_SIZE: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteSummary {
    pub lines: usize,
    pub batches: usize,
}

pub struct InfluxWriter {
    client: Client,
    config: InfluxConfig,
}

impl InfluxWriter {
    pub fn new(config: InfluxConfig, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::influx(format!("Failed to build InfluxDB client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn write_lines(&self, lines: &[String]) -> Result<WriteSummary, AppError> {
        let mut summary = WriteSummary::default();
        let url = format!("{}/api/v2/write", self.config.url.trim_end_matches('/'));

        for batch in lines.chunks(BATCH_SIZE) {
            let resp = self
                .client
                .post(&url)
                .query(&[
                    ("org", self.config.org.as_str()),
                    ("bucket", self.config.bucket.as_str()),
                    ("precision", "s"),
                ])
                .header(AUTHORIZATION, format!("Token {}", self.config.token))
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(batch.join("\n"))
                .send()
                .map_err(|e| AppError::influx(format!("InfluxDB request failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().unwrap_or_default();
                return Err(status_error(status, &body));
            }

            summary.lines += batch.len();
            summary.batches += 1;
            debug!(lines = batch.len(), "wrote batch to InfluxDB");
        }

        Ok(summary)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

fn status_error(status: StatusCode, body: &str) -> AppError {
    let reason = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .ok()
        .filter(|m| !m.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();

    if status == StatusCode::UNAUTHORIZED {
        AppError::influx(format!(
            "Authentication error with InfluxDB: {reason}. Check your token and permissions."
        ))
    } else {
        AppError::influx(format!("InfluxDB API error: {} - {reason}", status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;

    fn config(url: &str) -> InfluxConfig {
        InfluxConfig {
            url: url.to_string(),
            token: "secret".to_string(),
            org: "home".to_string(),
            bucket: "energy".to_string(),
        }
    }

    #[test]
    fn posts_lines_with_token_and_precision() {
        let server = serve(vec![(204, String::new())]);
        let writer = InfluxWriter::new(config(&server.base_url), Duration::from_secs(5)).unwrap();

        let lines = vec![
            "price,area=EE value=1 1".to_string(),
            "price,area=FI value=2 1".to_string(),
        ];
        let summary = writer.write_lines(&lines).unwrap();
        assert_eq!(summary, WriteSummary { lines: 2, batches: 1 });

        let requests = server.finish();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.method, "POST");
        assert_eq!(req.target, "/api/v2/write?org=home&bucket=energy&precision=s");
        assert_eq!(req.header("authorization"), Some("Token secret"));
        assert_eq!(req.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(req.body, "price,area=EE value=1 1\nprice,area=FI value=2 1");
    }

    #[test]
    fn large_writes_are_split_into_batches() {
        let server = serve(vec![(204, String::new()), (204, String::new())]);
        let writer = InfluxWriter::new(config(&server.base_url), Duration::from_secs(5)).unwrap();

        let lines: Vec<String> = (0..BATCH_SIZE + 1)
            .map(|i| format!("price,area=EE value=1 {i}"))
            .collect();
        let summary = writer.write_lines(&lines).unwrap();
        assert_eq!(summary, WriteSummary { lines: BATCH_SIZE + 1, batches: 2 });

        let requests = server.finish();
        assert_eq!(requests[1].body, format!("price,area=EE value=1 {BATCH_SIZE}"));
    }

    #[test]
    fn empty_input_sends_nothing() {
        let writer = InfluxWriter::new(config("http://127.0.0.1:9"), Duration::from_secs(1)).unwrap();
        let summary = writer.write_lines(&[]).unwrap();
        assert_eq!(summary, WriteSummary::default());
    }

    #[test]
    fn unauthorized_maps_to_authentication_error() {
        let server = serve(vec![(401, r#"{"code":"unauthorized","message":"unauthorized access"}"#.to_string())]);
        let writer = InfluxWriter::new(config(&server.base_url), Duration::from_secs(5)).unwrap();

        let err = writer.write_lines(&["m v=1 1".to_string()]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            err.message(),
            "Authentication error with InfluxDB: unauthorized access. Check your token and permissions."
        );
        server.finish();
    }

    #[test]
    fn other_statuses_report_code_and_reason() {
        let server = serve(vec![(404, "not json".to_string())]);
        let writer = InfluxWriter::new(config(&server.base_url), Duration::from_secs(5)).unwrap();

        let err = writer.write_lines(&["m v=1 1".to_string()]).unwrap_err();
        assert_eq!(err.message(), "InfluxDB API error: 404 - Not Found");
        server.finish();
    }
}
