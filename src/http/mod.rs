//! HTTP layer for the SES query API.
//!
//! ```text
//! ┌─────────────────┐
//! │  SesHttpClient  │  - Date signing
//! │                 │  - Error element detection
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  HttpTransport  │  - One round trip, no retries
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   reqwest       │  - Actual HTTP implementation
//! └─────────────────┘
//! ```

mod client;
mod request;
mod response;
mod transport;

pub use client::{SesHttpClient, DEFAULT_USER_AGENT, FORM_CONTENT_TYPE};
pub use request::{HttpMethod, HttpRequest, QueryParams};
pub use response::HttpResponse;
pub use transport::{HttpTransport, ReqwestTransport};

use async_trait::async_trait;
use crate::error::SesResult;

/// Trait for clients that execute SES query API calls.
///
/// Services depend on this trait rather than on [`SesHttpClient`], so they
/// can be driven by any implementation.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sign and send one call, returning the successful response.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials cannot be resolved, the transport
    /// fails, or the response carries an `<Error>` element.
    async fn execute(&self, params: QueryParams) -> SesResult<HttpResponse>;

    /// The endpoint URL calls are sent to.
    fn endpoint(&self) -> &str;

    /// The SES region.
    fn region(&self) -> &str;
}
