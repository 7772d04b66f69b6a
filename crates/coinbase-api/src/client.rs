//! HTTP transport for the Coinbase Exchange API.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, UpstreamError};

/// Performs one blocking GET and returns the raw response body.
///
/// [`crate::ExchangeDataClient`] issues every request through this trait, so
/// tests can substitute canned responses for the network.
pub trait Transport {
    /// GET `endpoint` (relative to the base URL) with the given query.
    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String>;

    /// Base URL requests are sent to.
    fn base_url(&self) -> &str;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
        (**self).get(endpoint, params)
    }

    fn base_url(&self) -> &str {
        (**self).base_url()
    }
}

/// Blocking HTTP client for the public Coinbase endpoints.
#[derive(Debug, Clone)]
pub struct CoinbaseClient {
    config: Arc<Config>,
    http: Client,
}

impl CoinbaseClient {
    /// Create a new client with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        // Coinbase rejects requests that carry no User-Agent
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Create a client for the default public endpoint.
    pub fn public() -> Result<Self> {
        Self::new(Config::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// Turn a status and body into the body text or an upstream error.
    fn handle_response(status: StatusCode, body: String) -> Result<String> {
        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });

        Err(UpstreamError::new(status.as_u16(), message, body).into())
    }
}

impl Transport for CoinbaseClient {
    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
        let url = self.url(endpoint);
        tracing::debug!("GET {} {:?}", url, params);

        let mut request = self.http.get(&url).header(ACCEPT, "application/json");
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        Self::handle_response(status, body)
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

/// Error response from the API.
#[derive(Debug, serde::Deserialize)]
struct ErrorResponse {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_url() {
        let client = CoinbaseClient::new(Config::new("http://localhost:9000/")).unwrap();
        assert_eq!(
            client.url("/products/BTC-USD/candles"),
            "http://localhost:9000/products/BTC-USD/candles"
        );
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_success_passes_body_through() {
        let body = CoinbaseClient::handle_response(StatusCode::OK, "[]".into()).unwrap();
        assert_eq!(body, "[]");
    }

    #[test]
    fn test_error_message_from_body() {
        let err = CoinbaseClient::handle_response(
            StatusCode::NOT_FOUND,
            r#"{"message":"NotFound"}"#.into(),
        )
        .unwrap_err();

        match err {
            Error::Upstream(e) => {
                assert_eq!(e.status, 404);
                assert_eq!(e.message, "NotFound");
                assert_eq!(e.body, r#"{"message":"NotFound"}"#);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_without_json_body() {
        let err = CoinbaseClient::handle_response(StatusCode::BAD_GATEWAY, "<html>".into())
            .unwrap_err();

        match err {
            Error::Upstream(e) => {
                assert!(e.is_server_error());
                assert_eq!(e.message, "Bad Gateway");
                assert_eq!(e.body, "<html>");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
