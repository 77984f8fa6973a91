//! Mapping of SES error documents to [`SesError`].
//!
//! The classic query API reports failures as:
//!
//! ```xml
//! <ErrorResponse xmlns="http://email.amazonaws.com/doc/2010-12-01/">
//!   <Error>
//!     <Type>Sender</Type>
//!     <Code>Throttling</Code>
//!     <Message>Rate exceeded</Message>
//!   </Error>
//!   <RequestId>a1b2c3</RequestId>
//! </ErrorResponse>
//! ```
//!
//! Parsing lives in [`crate::xml::parse_error_response`]; this module turns the
//! extracted fields into the error surfaced to callers.

use super::SesError;

/// Fields extracted from an `<Error>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceErrorResponse {
    /// `Sender` or `Receiver`, when present.
    pub error_type: Option<String>,
    /// The AWS error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Request ID from the enclosing `ErrorResponse`.
    pub request_id: Option<String>,
}

/// Convert a parsed error document into a [`SesError::Service`].
///
/// The code and message are carried over verbatim.
///
/// # Examples
///
/// ```rust
/// use ses_archiver::error::{map_service_error, ServiceErrorResponse};
///
/// let response = ServiceErrorResponse {
///     code: "Throttling".to_string(),
///     message: "Rate exceeded".to_string(),
///     ..Default::default()
/// };
///
/// let error = map_service_error(response, 400);
/// assert_eq!(error.error_code(), Some("Throttling"));
/// ```
pub fn map_service_error(response: ServiceErrorResponse, status: u16) -> SesError {
    SesError::Service {
        code: response.code,
        message: response.message,
        request_id: response.request_id,
        status,
    }
}
