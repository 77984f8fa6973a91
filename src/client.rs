//! SES client implementation.
//!
//! [`SesClient`] is the main entry point for SES operations. Service objects
//! are created on first access and share one HTTP client.
//!
//! # Example
//!
//! ```rust,no_run
//! use ses_archiver::SesClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SesClient::builder()
//!     .region("us-east-1")
//!     .credentials("AKID", "SECRET")
//!     .build()?;
//!
//! let response = client
//!     .send_email(["a@x.com", "b@x.com"], "Hi", "Body", "from@x.com")
//!     .await?;
//! println!("Message ID: {}", response.message_id);
//! # Ok(())
//! # }
//! ```

use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{SesConfig, SesConfigBuilder};
use crate::credentials::CredentialProvider;
use crate::error::SesResult;
use crate::http::{HttpClient, HttpTransport, SesHttpClient};
use crate::services::{AccountService, EmailService, IdentityService};
use crate::types::{
    EmailAddress, SendDataPoint, SendEmailRequest, SendEmailResponse, SendQuota,
    SendRawEmailRequest,
};

/// Client for the SES classic query API.
///
/// Cloning is cheap; clones share the HTTP client.
#[derive(Clone)]
pub struct SesClient {
    config: Arc<SesConfig>,
    http_client: Arc<dyn HttpClient>,
    email_service: OnceCell<EmailService>,
    identity_service: OnceCell<IdentityService>,
    account_service: OnceCell<AccountService>,
}

impl SesClient {
    /// Create a client backed by reqwest.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: SesConfig) -> SesResult<Self> {
        let http_client = SesHttpClient::new(config.clone())?;
        Ok(Self::from_parts(config, Arc::new(http_client)))
    }

    /// Create a client from `AWS_*` environment variables.
    ///
    /// See [`SesConfig::from_env`].
    pub fn from_env() -> SesResult<Self> {
        let config = SesConfig::from_env()?;
        Self::new(config)
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: SesConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let http_client = SesHttpClient::with_transport(config.clone(), transport);
        Self::from_parts(config, Arc::new(http_client))
    }

    fn from_parts(config: SesConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config: Arc::new(config),
            http_client,
            email_service: OnceCell::new(),
            identity_service: OnceCell::new(),
            account_service: OnceCell::new(),
        }
    }

    /// Create a new client builder.
    pub fn builder() -> SesClientBuilder {
        SesClientBuilder::default()
    }

    /// The client configuration.
    pub fn config(&self) -> &SesConfig {
        &self.config
    }

    /// The HTTP client shared by all services.
    pub fn http_client(&self) -> &Arc<dyn HttpClient> {
        &self.http_client
    }

    /// Email sending operations.
    pub fn emails(&self) -> &EmailService {
        self.email_service
            .get_or_init(|| EmailService::new(self.http_client.clone()))
    }

    /// Verified address operations.
    pub fn identities(&self) -> &IdentityService {
        self.identity_service
            .get_or_init(|| IdentityService::new(self.http_client.clone()))
    }

    /// Quota and statistics operations.
    pub fn account(&self) -> &AccountService {
        self.account_service
            .get_or_init(|| AccountService::new(self.http_client.clone()))
    }

    /// Send a plain text email to one or more recipients.
    pub async fn send_email<I, A>(
        &self,
        to: I,
        subject: &str,
        body: &str,
        from: &str,
    ) -> SesResult<SendEmailResponse>
    where
        I: IntoIterator<Item = A>,
        A: Into<EmailAddress>,
    {
        let request = SendEmailRequest::new(to, subject, body, from);
        self.emails().send_email(&request).await
    }

    /// Send a fully specified email.
    pub async fn send(&self, request: &SendEmailRequest) -> SesResult<SendEmailResponse> {
        self.emails().send_email(request).await
    }

    /// Send a raw MIME message; SES reads sender and recipients from its headers.
    pub async fn send_raw_email(&self, message: impl Into<Vec<u8>>) -> SesResult<SendEmailResponse> {
        let request = SendRawEmailRequest::new(message);
        self.emails().send_raw_email(&request).await
    }

    /// List the verified email addresses.
    pub async fn list_verified_email_addresses(&self) -> SesResult<Vec<String>> {
        self.identities().list_verified_email_addresses().await
    }

    /// Start verification of an address.
    pub async fn verify_email_address(&self, email: &str) -> SesResult<()> {
        self.identities().verify_email_address(email).await
    }

    /// Remove an address from the verified list.
    pub async fn delete_verified_email_address(&self, email: &str) -> SesResult<()> {
        self.identities().delete_verified_email_address(email).await
    }

    /// Get the sending limits of the account.
    pub async fn get_send_quota(&self) -> SesResult<SendQuota> {
        self.account().get_send_quota().await
    }

    /// Get the first sending statistics data point.
    pub async fn get_send_statistics(&self) -> SesResult<SendDataPoint> {
        self.account().get_send_statistics().await
    }

    /// Get every sending statistics data point.
    pub async fn get_send_statistics_all(&self) -> SesResult<Vec<SendDataPoint>> {
        self.account().get_send_statistics_all().await
    }
}

impl std::fmt::Debug for SesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SesClient")
            .field("config", &self.config)
            .field("endpoint", &self.http_client.endpoint())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SesClient`].
#[derive(Default)]
pub struct SesClientBuilder {
    config: SesConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl SesClientBuilder {
    /// Set the region (`us-east-1` or `eu-west-1`).
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config = self.config.region(region);
        self
    }

    /// Set a custom endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config = self.config.endpoint(endpoint);
        self
    }

    /// Set static credentials.
    pub fn credentials(mut self, access_key: &str, secret_key: &str) -> Self {
        self.config = self.config.credentials(access_key, secret_key);
        self
    }

    /// Set a custom credential provider.
    pub fn credentials_provider(
        mut self,
        provider: impl CredentialProvider + Send + Sync + 'static,
    ) -> Self {
        self.config = self.config.credentials_provider(provider);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.config = self.config.timeout(duration);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config = self.config.user_agent(ua);
        self
    }

    /// Use a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `SesError::Configuration` for an unsupported region, missing
    /// credentials or an invalid endpoint.
    pub fn build(self) -> SesResult<SesClient> {
        let config = self.config.build()?;
        match self.transport {
            Some(transport) => Ok(SesClient::with_transport(config, transport)),
            None => SesClient::new(config),
        }
    }
}
