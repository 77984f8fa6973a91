//! Amazon SES classic client and archiving log writer.
//!
//! # Features
//!
//! - **SES query API (2010-12-01)**: send formatted and raw email, manage
//!   verified addresses, read the sending quota and statistics
//! - **AWS3-HTTPS signing**: HMAC-SHA256 over the request date
//! - **Archiving log writer**: date-stamped file names and size-based
//!   rotation to the smallest free `.N` suffix
//! - **Error reporter**: maps error classes to log priorities, with an
//!   opt-in panic hook, writing to the archiver or to a buffered mail sink
//! - **Mail transport**: composes raw messages and submits them through
//!   `SendRawEmail`
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ses_archiver::{EmailBuilder, SesClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SesClient::from_env()?;
//!
//!     let request = EmailBuilder::new()
//!         .from("sender@example.com")
//!         .to("recipient@example.com")
//!         .subject("Hello from SES")
//!         .text("This is a test email.")
//!         .build()?;
//!
//!     let response = client.send(&request).await?;
//!     println!("Message sent! ID: {}", response.message_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Logging to an archiving file
//!
//! ```rust,no_run
//! use ses_archiver::logging::{
//!     ArchiveWriter, ArchiverConfig, ErrorClass, ErrorReporter, RotationFlags,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiverConfig::builder("/var/log/app")
//!     .prefix("app-")
//!     .flags(RotationFlags::DATE | RotationFlags::SIZE)
//!     .build()?;
//!
//! let reporter = ErrorReporter::with_sink(ArchiveWriter::open(config)?);
//! reporter.report(ErrorClass::Warning, "disk almost full", file!(), line!())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// Module declarations
pub mod builders;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod logging;
pub mod mail;
pub mod mocks;
pub mod services;
pub mod signing;
pub mod types;
pub mod xml;

// Re-export main client types
pub use client::{SesClient, SesClientBuilder};

// Re-export configuration types
pub use config::{ConfigError, SesConfig, SesConfigBuilder, SesRegion};

// Re-export credential types
pub use credentials::{
    AwsCredentials, CredentialError, CredentialProvider, EnvironmentCredentialProvider,
    StaticCredentialProvider,
};

// Re-export error types
pub use error::{SesError, SesResult};

// Re-export HTTP types
pub use http::{HttpClient, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, SesHttpClient};

// Re-export service types
pub use services::{AccountService, EmailService, IdentityService};

// Re-export request and response types
pub use types::{
    Action, Content, Destination, EmailAddress, RawMessage, SendDataPoint, SendEmailRequest,
    SendEmailResponse, SendQuota, SendRawEmailRequest,
};

// Re-export builder types
pub use builders::{BuilderError, EmailBuilder};

// Re-export logging types
pub use logging::{
    ArchiveWriter, ArchiverConfig, ErrorReporter, LogError, LogSink, MailSink, Priority,
};

// Re-export mail transport types
pub use mail::{MailMessage, MailTransportConfig, SesMailTransport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        let _ = std::any::type_name::<SesError>();
        let _ = std::any::type_name::<SesConfig>();
        let _ = std::any::type_name::<AwsCredentials>();
        let _ = std::any::type_name::<SendEmailRequest>();
        let _ = std::any::type_name::<ArchiveWriter>();
        let _ = std::any::type_name::<SesMailTransport>();
    }
}
