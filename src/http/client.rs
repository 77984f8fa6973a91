//! HTTP client implementation for the SES query API.
//!
//! Each call resolves credentials, signs the current date, POSTs the form
//! body and checks the response for an `<Error>` element.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::header::{CONTENT_TYPE, USER_AGENT};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::SesConfig;
use crate::error::{map_service_error, SesResult};
use crate::signing;
use crate::xml;

use super::request::{HttpRequest, QueryParams};
use super::response::HttpResponse;
use super::transport::{HttpTransport, ReqwestTransport};
use super::HttpClient;

/// Content type of every query API request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("ses-archiver/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the SES query API.
///
/// # Examples
///
/// ```rust,no_run
/// use ses_archiver::config::SesConfig;
/// use ses_archiver::http::{HttpClient, QueryParams, SesHttpClient};
/// use ses_archiver::types::Action;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SesConfig::builder()
///     .region("us-east-1")
///     .credentials("access_key", "secret_key")
///     .build()?;
///
/// let client = SesHttpClient::new(config)?;
/// let response = client.execute(QueryParams::for_action(Action::GetSendQuota)).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SesHttpClient {
    config: Arc<SesConfig>,
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl SesHttpClient {
    /// Create a client backed by reqwest.
    pub fn new(config: SesConfig) -> SesResult<Self> {
        let transport = ReqwestTransport::new(config.timeout, config.connect_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: SesConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let endpoint = config.ses_endpoint();
        Self {
            config: Arc::new(config),
            transport,
            endpoint,
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &SesConfig {
        &self.config
    }

    /// Build the signed request for `params` as issued at `timestamp`.
    pub async fn build_request(
        &self,
        params: &QueryParams,
        timestamp: &DateTime<Utc>,
    ) -> SesResult<HttpRequest> {
        let credentials = self.config.credentials_provider.credentials().await?;
        let signature = signing::sign(&credentials, timestamp)?;

        let user_agent = self
            .config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let mut request = HttpRequest::post(self.endpoint.clone())
            .with_header(CONTENT_TYPE.as_str(), FORM_CONTENT_TYPE)
            .with_header(USER_AGENT.as_str(), user_agent)
            .with_body(params.to_form_body()?);

        for (name, value) in signature.headers() {
            request = request.with_header(name, value);
        }

        Ok(request)
    }

    /// Fail with a service error when the body carries an `<Error>` element.
    fn check_for_errors(&self, action: &str, response: HttpResponse) -> SesResult<HttpResponse> {
        match xml::parse_error_response(&response.text())? {
            Some(mut error) => {
                if error.request_id.is_none() {
                    error.request_id = response.request_id().map(str::to_string);
                }
                warn!(
                    action = %action,
                    status = response.status,
                    code = %error.code,
                    request_id = ?error.request_id,
                    "SES returned an error"
                );
                Err(map_service_error(error, response.status))
            }
            None => Ok(response),
        }
    }
}

#[async_trait]
impl HttpClient for SesHttpClient {
    async fn execute(&self, params: QueryParams) -> SesResult<HttpResponse> {
        let action = params.action().unwrap_or_default().to_string();
        debug!(action = %action, endpoint = %self.endpoint, "Sending SES request");

        let request = self.build_request(&params, &Utc::now()).await?;
        let response = self.transport.send(request).await?;

        debug!(action = %action, status = response.status, "Received SES response");
        self.check_for_errors(&action, response)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn region(&self) -> &str {
        self.config.region.as_str()
    }
}

impl std::fmt::Debug for SesHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SesHttpClient")
            .field("endpoint", &self.endpoint)
            .field("region", &self.config.region)
            .finish_non_exhaustive()
    }
}
