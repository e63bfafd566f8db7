//! NDB HTTP client
//!
//! Thin blocking wrapper over `reqwest` that issues keyed GET requests and
//! decodes JSON bodies.

use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

/// Public NDB search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://api.nal.usda.gov/ndb/search";
/// Public NDB V2 report endpoint
pub const DEFAULT_REPORT_URL: &str = "https://api.nal.usda.gov/ndb/V2/reports";

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// NDB request error types
#[derive(Debug, Error)]
pub enum NdbError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for NDB requests
pub type NdbResult<T> = Result<T, NdbError>;

/// Client for the NDB search and report endpoints
#[derive(Debug, Clone)]
pub struct NdbClient {
    http: Client,
    api_key: String,
    pub(crate) search_url: String,
    pub(crate) report_url: String,
}

impl NdbClient {
    /// Create a client against the public endpoints
    pub fn new(api_key: impl Into<String>) -> NdbResult<Self> {
        let http = Client::builder().user_agent(APP_USER_AGENT).build()?;
        Ok(Self::with_http_client(http, api_key))
    }

    /// Create a client around an existing `reqwest` client
    pub fn with_http_client(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            report_url: DEFAULT_REPORT_URL.to_string(),
        }
    }

    /// Override the search endpoint
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    /// Override the report endpoint
    pub fn with_report_url(mut self, url: impl Into<String>) -> Self {
        self.report_url = url.into();
        self
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    pub fn report_url(&self) -> &str {
        &self.report_url
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// GET `url` with query parameters and parse the body as JSON
    ///
    /// Non-2xx statuses are errors. The URL is stripped from transport errors
    /// since its query carries the API key.
    pub(crate) fn get_json(&self, url: &str, params: &[(&str, &str)]) -> NdbResult<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.without_url())?;

        let body = response.text().map_err(|e| e.without_url())?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    /// Client pointed at a local mock server, bypassing any proxy settings
    pub(crate) fn mock_client(server: &Server) -> NdbClient {
        let http = Client::builder().no_proxy().build().unwrap();
        NdbClient::with_http_client(http, "TEST_KEY")
            .with_search_url(format!("{}/ndb/search", server.url()))
            .with_report_url(format!("{}/ndb/V2/reports", server.url()))
    }

    #[test]
    fn test_default_endpoints() {
        let client = NdbClient::new("KEY").unwrap();
        assert_eq!(client.search_url(), DEFAULT_SEARCH_URL);
        assert_eq!(client.report_url(), DEFAULT_REPORT_URL);
        assert_eq!(client.api_key(), "KEY");
    }

    #[test]
    fn test_get_json_sends_query() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/echo")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("a".into(), "1".into()),
                Matcher::UrlEncoded("b".into(), "two words".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true}"#)
            .create();

        let client = mock_client(&server);
        let url = format!("{}/echo", server.url());
        let value = client.get_json(&url, &[("a", "1"), ("b", "two words")]).unwrap();

        assert_eq!(value["ok"], Value::Bool(true));
        mock.assert();
    }

    #[test]
    fn test_get_json_non_2xx_is_request_error() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/fail").match_query(Matcher::Any).with_status(503).create();

        let client = mock_client(&server);
        let url = format!("{}/fail", server.url());
        let err = client.get_json(&url, &[("api_key", "SECRET")]).unwrap_err();

        match err {
            NdbError::Request(e) => {
                assert_eq!(e.status().map(|s| s.as_u16()), Some(503));
                assert!(!e.to_string().contains("SECRET"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_get_json_malformed_body_is_decode_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/bad")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create();

        let client = mock_client(&server);
        let url = format!("{}/bad", server.url());
        let err = client.get_json(&url, &[]).unwrap_err();
        assert!(matches!(err, NdbError::Decode(_)));
    }
}
