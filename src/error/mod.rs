//! Error types for the SES classic client.
//!
//! Every fallible SES operation returns [`SesResult`]. Errors fall into three
//! families, none of which is retried by this crate:
//!
//! - **Configuration**: bad region, missing credentials, unusable endpoint.
//!   Raised while building a client.
//! - **Transport**: network failures and timeouts. The underlying cause is
//!   kept as the error source.
//! - **Service**: the response body carried an `<Error>` element. The AWS
//!   code and message are surfaced verbatim.
//!
//! # Examples
//!
//! ```rust
//! use ses_archiver::error::SesError;
//!
//! fn describe(error: &SesError) {
//!     if let Some(code) = error.error_code() {
//!         println!("SES rejected the call: {}", code);
//!     }
//! }
//! ```

mod mapping;

pub use mapping::{map_service_error, ServiceErrorResponse};

use thiserror::Error;

use crate::builders::BuilderError;
use crate::config::ConfigError;
use crate::credentials::CredentialError;

/// Result alias used across the SES client.
pub type SesResult<T> = Result<T, SesError>;

/// Top-level error type for the SES classic client.
#[derive(Debug, Error)]
pub enum SesError {
    /// The client is misconfigured.
    ///
    /// Raised at construction time for an unsupported region, missing
    /// credentials or an unparsable endpoint.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Credentials could not be resolved.
    #[error("Credential error: {message}")]
    Credential {
        /// Description of the credential error.
        message: String,
    },

    /// Computing the request signature failed.
    #[error("Signing error: {message}")]
    Signing {
        /// Description of the signing error.
        message: String,
    },

    /// The request never produced a response.
    #[error("Error in request to AWS service: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
        /// Original cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request exceeded the configured timeout.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
        /// Original cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// SES answered with an `<Error>` element.
    #[error("AWS service error: {code} - {message}")]
    Service {
        /// AWS error code (e.g. `Throttling`, `MessageRejected`).
        code: String,
        /// Human-readable error message.
        message: String,
        /// AWS request ID, when the response carried one.
        request_id: Option<String>,
        /// HTTP status of the response.
        status: u16,
    },

    /// The response body was not well-formed XML.
    #[error("XML error: {message}")]
    Xml {
        /// Description of the parse failure.
        message: String,
    },

    /// A request failed client-side validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation, if known.
        field: Option<String>,
    },
}

impl SesError {
    /// Returns the AWS error code for service errors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ses_archiver::error::SesError;
    ///
    /// let error = SesError::Service {
    ///     code: "Throttling".to_string(),
    ///     message: "Rate exceeded".to_string(),
    ///     request_id: None,
    ///     status: 400,
    /// };
    ///
    /// assert_eq!(error.error_code(), Some("Throttling"));
    /// ```
    pub fn error_code(&self) -> Option<&str> {
        match self {
            SesError::Service { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Returns the AWS request ID for service errors.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            SesError::Service { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Returns true when SES itself rejected the call.
    pub fn is_service_error(&self) -> bool {
        matches!(self, SesError::Service { .. })
    }

    /// Returns true for errors raised while building a client.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SesError::Configuration { .. } | SesError::Credential { .. }
        )
    }

    /// Returns true for network failures and timeouts.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, SesError::Transport { .. } | SesError::Timeout { .. })
    }
}

impl From<ConfigError> for SesError {
    fn from(err: ConfigError) -> Self {
        SesError::Configuration {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<CredentialError> for SesError {
    fn from(err: CredentialError) -> Self {
        SesError::Credential {
            message: err.to_string(),
        }
    }
}

impl From<BuilderError> for SesError {
    fn from(err: BuilderError) -> Self {
        let field = match &err {
            BuilderError::MissingField { field } | BuilderError::InvalidValue { field, .. } => {
                Some(field.clone())
            }
        };
        SesError::Validation {
            message: err.to_string(),
            field,
        }
    }
}

impl From<quick_xml::Error> for SesError {
    fn from(err: quick_xml::Error) -> Self {
        SesError::Xml {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SesError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SesError::Timeout {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        } else {
            SesError::Transport {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}
