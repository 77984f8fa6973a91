//! Service adapters for the SES query API.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        Service Adapters (this module)       │
//! │  - emails: SendEmail, SendRawEmail          │
//! │  - identities: verified address management  │
//! │  - account: quota and statistics            │
//! └──────────────────────┬──────────────────────┘
//!                        │
//!                        ▼
//! ┌─────────────────────────────────────────────┐
//! │                 HTTP Client                 │
//! │       (date signing, error detection)       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod account;
pub mod emails;
pub mod identities;

pub use account::AccountService;
pub use emails::EmailService;
pub use identities::IdentityService;

use std::sync::Arc;
use crate::http::HttpClient;

/// Common trait for all SES services.
pub trait SesService: Send + Sync {
    /// Get a reference to the HTTP client.
    fn http_client(&self) -> &Arc<dyn HttpClient>;
}
