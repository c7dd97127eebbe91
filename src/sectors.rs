//! Sectors API data access layer
//!
//! Issues authenticated GET requests against the Sectors REST endpoints and
//! normalizes every failure into a JSON error mapping. Callers always get a
//! `Value` back; transport and HTTP errors are data, not faults, so the
//! model can phrase a user-facing explanation.
//! Uses a long-lived reqwest::Client for connection pooling.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.sectors.app";

/// Reusable Sectors client (connection-pooled)
#[derive(Clone)]
pub struct SectorsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SectorsClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different host. Used by tests to target stub
    /// endpoints.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Perform a single GET attempt and normalize the outcome.
    ///
    /// No retries, no backoff: one attempt per call.
    pub async fn fetch(&self, url: &str) -> Value {
        debug!(%url, "Sectors API request");

        let response = match self
            .client
            .get(url)
            .header("Authorization", &self.api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return unexpected_error(url, &e),
        };

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let reason = status.canonical_reason().unwrap_or("Unknown");
            let detail = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "Sectors API returned an error status");

            return json!({
                "error": format!("HTTPError {} - {}", status.as_u16(), reason),
                "url": url,
                "detail": detail,
            });
        }

        match response.json::<Value>().await {
            Ok(body) => body,
            Err(e) => unexpected_error(url, &e),
        }
    }

    /// Companies with the highest dividend yield for a year. Fixed page size
    /// of 10; entries with missing classification values are excluded.
    pub async fn top_dividend(&self, year: &str) -> Value {
        let url = format!(
            "{}/v1/companies/top/?classifications=dividend_yield&n_stock=10&year={}&include_none=false",
            self.base_url, year
        );
        self.fetch(&url).await
    }

    /// The "overview" section of a company report.
    pub async fn company_overview(&self, ticker: &str) -> Value {
        self.report_section(ticker, "overview").await
    }

    /// The "financials" section of a company report.
    pub async fn company_financials(&self, ticker: &str) -> Value {
        self.report_section(ticker, "financials").await
    }

    /// The "dividend" section of a company report.
    pub async fn company_dividend(&self, ticker: &str) -> Value {
        self.report_section(ticker, "dividend").await
    }

    async fn report_section(&self, ticker: &str, section: &str) -> Value {
        let url = format!(
            "{}/v1/company/report/{}/?sections={}",
            self.base_url, ticker, section
        );
        self.fetch(&url).await
    }
}

fn error_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "Timeout"
    } else if e.is_connect() {
        "Connect"
    } else if e.is_decode() {
        "Decode"
    } else {
        "Request"
    }
}

fn unexpected_error(url: &str, e: &reqwest::Error) -> Value {
    warn!(%url, error = %e, "Sectors API request failed");

    json!({
        "error": format!("Unexpected error: {} - {}", error_kind(e), e),
        "url": url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_overview_passes_payload_through_unchanged() {
        let router = Router::new().route(
            "/v1/company/report/:ticker/",
            get(|| async { Json(json!({"sector": "Banking"})) }),
        );
        let base_url = spawn_stub(router).await;

        let client = SectorsClient::with_base_url("test-key".into(), base_url);
        let result = client.company_overview("BBCA").await;

        assert_eq!(result, json!({"sector": "Banking"}));
    }

    #[tokio::test]
    async fn test_http_error_maps_to_error_record() {
        let router = Router::new().route(
            "/v1/company/report/:ticker/",
            get(|| async { (StatusCode::NOT_FOUND, "ticker not found") }),
        );
        let base_url = spawn_stub(router).await;

        let client = SectorsClient::with_base_url("test-key".into(), base_url);
        let result = client.company_dividend("ZZZZ").await;

        assert_eq!(result["error"], "HTTPError 404 - Not Found");
        assert_eq!(result["detail"], "ticker not found");
        assert!(result["url"]
            .as_str()
            .unwrap()
            .contains("/v1/company/report/ZZZZ/?sections=dividend"));
    }

    #[tokio::test]
    async fn test_empty_json_body_is_not_an_error() {
        let router = Router::new().route(
            "/v1/company/report/:ticker/",
            get(|| async { Json(json!({})) }),
        );
        let base_url = spawn_stub(router).await;

        let client = SectorsClient::with_base_url("test-key".into(), base_url);
        let result = client.company_financials("BBRI").await;

        assert!(result.as_object().unwrap().is_empty());
        assert!(result.get("error").is_none());
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_unexpected_error() {
        // Bind then drop a listener so the port is known-dead.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            SectorsClient::with_base_url("test-key".into(), format!("http://{}", addr));
        let result = client.company_overview("BBCA").await;

        let error = result["error"].as_str().unwrap();
        assert!(error.starts_with("Unexpected error:"), "got: {}", error);
        assert!(result["url"].as_str().unwrap().contains("BBCA"));
        assert!(result.get("detail").is_none());
    }

    #[tokio::test]
    async fn test_top_dividend_query_parameters() {
        // Echo the query string back so the test can inspect the built URL.
        let router = Router::new().route(
            "/v1/companies/top/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!(params))
            }),
        );
        let base_url = spawn_stub(router).await;

        let client = SectorsClient::with_base_url("test-key".into(), base_url);
        let result = client.top_dividend("2026").await;

        assert_eq!(result["classifications"], "dividend_yield");
        assert_eq!(result["n_stock"], "10");
        assert_eq!(result["year"], "2026");
        assert_eq!(result["include_none"], "false");
    }
}
