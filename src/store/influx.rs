//! InfluxDB v2 query client
//!
//! Posts Flux scripts to `/api/v2/query` and decodes the annotated CSV
//! response.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::annotated_csv;
use super::error::{StoreError, StoreResult};
use super::timeseries::{FluxRecord, TimeSeriesStore};
use crate::config::InfluxConfig;

/// InfluxDB query API client
pub struct InfluxClient {
    client: Client,
    config: InfluxConfig,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    dialect: Dialect,
}

#[derive(Debug, Serialize)]
struct Dialect {
    annotations: [&'static str; 3],
    header: bool,
    delimiter: &'static str,
}

impl<'a> QueryRequest<'a> {
    fn flux(query: &'a str) -> Self {
        Self {
            query,
            kind: "flux",
            dialect: Dialect {
                annotations: ["datatype", "group", "default"],
                header: true,
                delimiter: ",",
            },
        }
    }
}

impl InfluxClient {
    pub fn new(config: InfluxConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &InfluxConfig {
        &self.config
    }

    fn query_url(&self) -> String {
        format!("{}/api/v2/query", self.config.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TimeSeriesStore for InfluxClient {
    async fn query(&self, script: &str) -> StoreResult<Vec<FluxRecord>> {
        tracing::debug!(script = %script, "Executing Flux query");

        let response = self
            .client
            .post(self.query_url())
            .query(&[("org", self.config.org.as_str())])
            .header(AUTHORIZATION, format!("Token {}", self.config.token))
            .header(ACCEPT, "application/csv")
            .json(&QueryRequest::flux(script))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(StoreError::TimeSeries {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        annotated_csv::decode(&body)
    }
}

/// Error bodies are JSON `{"code": .., "message": ..}`; fall back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(QueryRequest::flux("from(bucket: \"b\")")).unwrap();
        assert_eq!(body["type"], "flux");
        assert_eq!(body["query"], "from(bucket: \"b\")");
        assert_eq!(body["dialect"]["header"], true);
        assert_eq!(
            body["dialect"]["annotations"],
            serde_json::json!(["datatype", "group", "default"])
        );
    }

    #[test]
    fn test_query_url() {
        let client = InfluxClient::new(InfluxConfig {
            url: "http://influx:8086/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.query_url(), "http://influx:8086/api/v2/query");
        assert_eq!(client.config().org, "nema");
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"code":"invalid","message":"compilation failed"}"#),
            "compilation failed"
        );
        assert_eq!(error_message("  bad gateway\n"), "bad gateway");
    }
}
