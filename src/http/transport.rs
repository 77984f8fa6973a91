//! Transport layer abstraction for HTTP communication.
//!
//! The default implementation uses reqwest. Tests plug in
//! [`MockTransport`](crate::mocks::MockTransport) instead.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use super::request::{HttpMethod, HttpRequest};
use super::response::HttpResponse;
use crate::error::{SesError, SesResult};

/// Trait for HTTP transport implementations.
///
/// A transport performs exactly one round trip. Any response, including a
/// non-2xx one, is returned as `Ok`; only failures to obtain a response are
/// errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request and return the response.
    async fn send(&self, request: HttpRequest) -> SesResult<HttpResponse>;
}

/// Reqwest-based HTTP transport implementation.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new reqwest transport.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use ses_archiver::http::ReqwestTransport;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let transport = ReqwestTransport::new(
    ///     Duration::from_secs(10),
    ///     Duration::from_secs(10)
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(timeout: Duration, connect_timeout: Duration) -> SesResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .build()
            .map_err(|e| SesError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> SesResult<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}
