//! Email sending operations.

use std::sync::Arc;
use tracing::info;

use crate::builders::BuilderError;
use crate::error::SesResult;
use crate::http::HttpClient;
use crate::types::{SendEmailRequest, SendEmailResponse, SendRawEmailRequest};
use crate::xml;
use super::SesService;

/// Service for email sending operations.
///
/// - `SendEmail` for formatted text/HTML messages
/// - `SendRawEmail` for pre-built MIME messages
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ses_archiver::config::SesConfig;
/// use ses_archiver::http::SesHttpClient;
/// use ses_archiver::services::EmailService;
/// use ses_archiver::types::SendEmailRequest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SesConfig::builder().credentials("key", "secret").build()?;
/// let service = EmailService::new(Arc::new(SesHttpClient::new(config)?));
///
/// let request = SendEmailRequest::new(["a@x.com", "b@x.com"], "Hi", "Body", "from@x.com");
/// let response = service.send_email(&request).await?;
/// println!("Message ID: {}", response.message_id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EmailService {
    http_client: Arc<dyn HttpClient>,
}

impl EmailService {
    /// Create a new email service.
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Send a formatted email.
    ///
    /// All recipients go out in one call; the call succeeds or fails as a
    /// whole.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the request has no source or no
    /// recipients, without contacting SES.
    pub async fn send_email(&self, request: &SendEmailRequest) -> SesResult<SendEmailResponse> {
        if request.source.email.is_empty() {
            return Err(BuilderError::missing_field("source").into());
        }
        if request.destination.recipient_count() == 0 {
            return Err(BuilderError::missing_field("destination").into());
        }

        let response = self.http_client.execute(request.to_params()).await?;
        let message_id = xml::parse_message_id(&response.text())?;

        info!(
            message_id = %message_id,
            recipients = request.destination.recipient_count(),
            "Email sent"
        );
        Ok(SendEmailResponse { message_id })
    }

    /// Send a raw MIME message.
    pub async fn send_raw_email(&self, request: &SendRawEmailRequest) -> SesResult<SendEmailResponse> {
        if request.raw_message.data.is_empty() {
            return Err(BuilderError::missing_field("raw_message").into());
        }

        let response = self.http_client.execute(request.to_params()).await?;
        let message_id = xml::parse_message_id(&response.text())?;

        info!(message_id = %message_id, "Raw email sent");
        Ok(SendEmailResponse { message_id })
    }
}

impl SesService for EmailService {
    fn http_client(&self) -> &Arc<dyn HttpClient> {
        &self.http_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SesError;
    use crate::http::SesHttpClient;
    use crate::mocks::{MockResponse, MockTransport, TestFixtures};

    fn service(transport: Arc<MockTransport>) -> EmailService {
        EmailService::new(Arc::new(SesHttpClient::with_transport(
            TestFixtures::config(),
            transport,
        )))
    }

    #[tokio::test]
    async fn test_send_email() {
        let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::ok_with_body(
            TestFixtures::send_email_xml("0000-msg"),
        )]));
        let service = service(transport.clone());

        let request = SendEmailRequest::new(["a@x.com", "b@x.com"], "Hi", "Body", "from@x.com");
        let response = service.send_email(&request).await.unwrap();

        assert_eq!(response.message_id, "0000-msg");
        let sent = transport.last_request().unwrap().form_params();
        assert!(sent.contains(&("Action".to_string(), "SendEmail".to_string())));
        assert!(sent.contains(&(
            "Destination.ToAddresses.member.2".to_string(),
            "b@x.com".to_string()
        )));
    }

    #[tokio::test]
    async fn test_send_email_without_recipients_is_rejected_locally() {
        let transport = Arc::new(MockTransport::new());
        let service = service(transport.clone());

        let request = SendEmailRequest::new(Vec::<String>::new(), "Hi", "Body", "from@x.com");
        let err = service.send_email(&request).await.unwrap_err();

        assert!(matches!(err, SesError::Validation { field: Some(ref f), .. } if f == "destination"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_send_raw_email() {
        let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::ok_with_body(
            TestFixtures::send_raw_email_xml("raw-42"),
        )]));
        let service = service(transport.clone());

        let request = SendRawEmailRequest::new("Subject: hi\r\n\r\nbody");
        let response = service.send_raw_email(&request).await.unwrap();

        assert_eq!(response.message_id, "raw-42");
        assert_eq!(
            transport.last_request().unwrap().form_params()[1],
            ("RawMessage.Data".to_string(), "U3ViamVjdDogaGkNCg0KYm9keQ==".to_string())
        );
    }

    #[tokio::test]
    async fn test_send_email_service_error() {
        let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
            400,
            TestFixtures::error_xml("MessageRejected", "Email address is not verified."),
        )]));
        let service = service(transport);

        let request = SendEmailRequest::new(["a@x.com"], "Hi", "Body", "from@x.com");
        let err = service.send_email(&request).await.unwrap_err();

        assert_eq!(err.error_code(), Some("MessageRejected"));
        assert_eq!(err.request_id(), Some("test-request-id"));
    }
}
