//! Mail transport backed by `SendRawEmail`.
//!
//! [`SesMailTransport`] takes a message as a header block, a recipient list,
//! a subject and a body, composes the raw RFC 5322 text and submits it.
//! SES reads the sender and recipients from the composed headers.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::client::SesClient;
use crate::config::SesConfig;
use crate::error::{SesError, SesResult};
use crate::http::HttpTransport;
use crate::types::SendEmailResponse;

const CRLF: &[u8] = b"\r\n";

/// Parameters of a [`SesMailTransport`].
#[derive(Clone)]
pub struct MailTransportConfig {
    /// AWS access key id.
    pub aws_key: String,
    /// AWS secret access key.
    pub aws_secret: SecretString,
    /// SES region; `us-east-1` when absent.
    pub aws_region: Option<String>,
}

impl MailTransportConfig {
    /// Create a configuration for the primary region.
    pub fn new(aws_key: impl Into<String>, aws_secret: impl Into<String>) -> Self {
        Self {
            aws_key: aws_key.into(),
            aws_secret: SecretString::new(aws_secret.into()),
            aws_region: None,
        }
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.aws_region = Some(region.into());
        self
    }

    fn to_ses_config(&self) -> SesResult<SesConfig> {
        if self.aws_key.is_empty() {
            return Err(SesError::Configuration {
                message: "You must send the aws_key (access key) param".to_string(),
                source: None,
            });
        }
        if self.aws_secret.expose_secret().is_empty() {
            return Err(SesError::Configuration {
                message: "You must send the aws_secret (secret key) param".to_string(),
                source: None,
            });
        }

        let mut builder = SesConfig::builder()
            .credentials(&self.aws_key, self.aws_secret.expose_secret());
        if let Some(region) = &self.aws_region {
            builder = builder.region(region.as_str());
        }
        Ok(builder.build()?)
    }
}

impl fmt::Debug for MailTransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailTransportConfig")
            .field("aws_key", &self.aws_key)
            .field("aws_secret", &"[REDACTED]")
            .field("aws_region", &self.aws_region)
            .finish()
    }
}

/// A message as handed to a mail transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailMessage {
    /// Header fields other than `To` and `Subject`, in order.
    pub headers: Vec<(String, String)>,
    /// Recipient addresses for the `To` header.
    pub recipients: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

impl MailMessage {
    /// Create a message.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Add a header field.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a recipient.
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.recipients.push(recipient.into());
        self
    }

    /// Compose the raw message.
    ///
    /// Header fields come first, then `To` and `Subject`, a blank line and
    /// the body. A `Content-Type: text/plain; charset=utf-8` field is added
    /// unless one was supplied. Lines end in CRLF. Header values holding
    /// non-ASCII or control characters are RFC 2047 encoded.
    ///
    /// # Errors
    ///
    /// `SesError::Validation` for a header name with control characters or
    /// a colon, and for a recipient with control characters.
    pub fn compose(&self) -> SesResult<Vec<u8>> {
        if let Some(recipient) = self
            .recipients
            .iter()
            .find(|r| r.chars().any(char::is_control))
        {
            return Err(SesError::Validation {
                message: format!("Invalid recipient: {:?}", recipient),
                field: Some("recipients".to_string()),
            });
        }

        let mut output = Vec::with_capacity(self.body.len() + 256);

        for (name, value) in &self.headers {
            write_header(&mut output, name, value)?;
        }
        let has_content_type = self
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
        if !has_content_type {
            write_header(
                &mut output,
                "Content-Type",
                mime::TEXT_PLAIN_UTF_8.as_ref(),
            )?;
        }

        write_header(&mut output, "To", &self.recipients.join(", "))?;
        write_header(&mut output, "Subject", &self.subject)?;
        output.extend_from_slice(CRLF);
        output.extend_from_slice(self.body.as_bytes());
        Ok(output)
    }
}

fn write_header(output: &mut Vec<u8>, name: &str, value: &str) -> SesResult<()> {
    if name.is_empty() || name.chars().any(|c| c.is_control() || c == ':') {
        return Err(SesError::Validation {
            message: format!("Invalid header name: {:?}", name),
            field: Some("headers".to_string()),
        });
    }

    output.extend_from_slice(name.as_bytes());
    output.extend_from_slice(b": ");
    output.extend_from_slice(encode_header(value).as_bytes());
    output.extend_from_slice(CRLF);
    Ok(())
}

/// RFC 2047 `B` encoding for values that are not plain printable ASCII.
fn encode_header(value: &str) -> Cow<'_, str> {
    if value.chars().all(|c| c.is_ascii() && !c.is_control()) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes())))
}

/// Sends [`MailMessage`]s through SES.
#[derive(Debug, Clone)]
pub struct SesMailTransport {
    client: SesClient,
}

impl SesMailTransport {
    /// Create a transport from access key, secret and optional region.
    ///
    /// # Errors
    ///
    /// `SesError::Configuration` when the key or secret is empty or the
    /// region is not supported.
    pub fn new(config: MailTransportConfig) -> SesResult<Self> {
        let client = SesClient::new(config.to_ses_config()?)?;
        Ok(Self { client })
    }

    /// Create a transport sending through a custom HTTP transport.
    pub fn with_transport(
        config: MailTransportConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> SesResult<Self> {
        let client = SesClient::with_transport(config.to_ses_config()?, transport);
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: SesClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &SesClient {
        &self.client
    }

    /// Compose and send `message`.
    pub async fn send(&self, message: &MailMessage) -> SesResult<SendEmailResponse> {
        if message.recipients.is_empty() {
            return Err(SesError::Validation {
                message: "At least one recipient is required".to_string(),
                field: Some("recipients".to_string()),
            });
        }

        let raw = message.compose()?;
        debug!(recipients = message.recipients.len(), bytes = raw.len(), "Sending mail");
        self.client.send_raw_email(raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockTransport, TestFixtures};

    fn message() -> MailMessage {
        MailMessage::new("Greetings", "Hello there")
            .header("From", "sender@example.com")
            .to("a@x.com")
            .to("b@x.com")
    }

    #[test]
    fn test_compose_layout() {
        let raw = String::from_utf8(message().compose().unwrap()).unwrap();

        assert_eq!(
            raw,
            "From: sender@example.com\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\
             To: a@x.com, b@x.com\r\n\
             Subject: Greetings\r\n\
             \r\n\
             Hello there"
        );
    }

    #[test]
    fn test_compose_keeps_supplied_content_type() {
        let raw = String::from_utf8(
            message().header("content-type", "text/html").compose().unwrap(),
        )
        .unwrap();

        assert!(raw.contains("content-type: text/html\r\n"));
        assert!(!raw.contains("text/plain"));
    }

    #[test]
    fn test_crlf_in_subject_cannot_add_headers() {
        let raw = MailMessage::new("Hi\r\nBcc: attacker@evil.com", "body")
            .to("b@x.com")
            .compose()
            .unwrap();
        let raw = String::from_utf8(raw).unwrap();

        assert!(raw.contains("Subject: =?UTF-8?B?SGkNCkJjYzogYXR0YWNrZXJAZXZpbC5jb20=?=\r\n"));
        assert!(!raw.contains("\r\nBcc:"));
    }

    #[test]
    fn test_utf8_subject_and_header_encoded() {
        let raw = MailMessage::new("Grüße", "body")
            .header("X-Note", "Ärger")
            .to("b@x.com")
            .compose()
            .unwrap();
        let raw = String::from_utf8(raw).unwrap();

        assert!(raw.contains("Subject: =?UTF-8?B?R3LDvMOfZQ==?=\r\n"));
        assert!(raw.contains("X-Note: =?UTF-8?B?w4RyZ2Vy?=\r\n"));
        assert!(raw.contains("To: b@x.com\r\n"));
    }

    #[test]
    fn test_invalid_header_name_or_recipient() {
        let bad_name = MailMessage::new("s", "b")
            .header("X-Bad\r\nBcc", "v")
            .to("b@x.com")
            .compose();
        assert!(matches!(bad_name, Err(SesError::Validation { .. })));

        let bad_recipient = MailMessage::new("s", "b")
            .to("b@x.com\r\nBcc: evil@x.com")
            .compose();
        assert!(matches!(bad_recipient, Err(SesError::Validation { .. })));
    }

    #[test]
    fn test_missing_key_or_secret() {
        let err = SesMailTransport::new(MailTransportConfig::new("", "secret")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: You must send the aws_key (access key) param"
        );

        let err = SesMailTransport::new(MailTransportConfig::new("key", "")).unwrap_err();
        assert!(err.to_string().contains("aws_secret (secret key)"));
    }

    #[test]
    fn test_invalid_region() {
        let config = MailTransportConfig::new("key", "secret").with_region("sa-east-1");
        let err = SesMailTransport::new(config).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", MailTransportConfig::new("key", "very-secret"));
        assert!(!debug.contains("very-secret"));
    }

    #[tokio::test]
    async fn test_send_submits_raw_message() {
        let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::ok_with_body(
            TestFixtures::send_raw_email_xml("raw-1"),
        )]));
        let config = MailTransportConfig::new(TestFixtures::ACCESS_KEY, TestFixtures::SECRET_KEY)
            .with_region("eu-west-1");
        let mailer = SesMailTransport::with_transport(config, transport.clone()).unwrap();

        let response = mailer.send(&message()).await.unwrap();

        assert_eq!(response.message_id, "raw-1");
        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://email.eu-west-1.amazonaws.com/");
        let params = request.form_params();
        assert!(params.contains(&("Action".to_string(), "SendRawEmail".to_string())));
        let data = params
            .iter()
            .find(|(k, _)| k == "RawMessage.Data")
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(STANDARD.decode(data).unwrap(), message().compose().unwrap());
    }

    #[tokio::test]
    async fn test_send_requires_recipients() {
        let transport = Arc::new(MockTransport::new());
        let mailer = SesMailTransport::with_client(TestFixtures::client(transport.clone()));

        let err = mailer
            .send(&MailMessage::new("s", "b"))
            .await
            .unwrap_err();

        assert!(matches!(err, SesError::Validation { .. }));
        assert_eq!(transport.request_count(), 0);
    }
}
