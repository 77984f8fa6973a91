//! Outbound email request types.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::Action;
use crate::http::QueryParams;

/// Charset used when none is given.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Represents an email address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmailAddress {
    /// Email address (e.g., "user@example.com").
    pub email: String,
    /// Display name (e.g., "John Doe").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl EmailAddress {
    /// Create a new email address without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
        }
    }

    /// Create a new email address with a display name.
    pub fn with_name(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: Some(display_name.into()),
        }
    }

    /// Format the email address for use in email headers.
    pub fn format(&self) -> String {
        match &self.display_name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

impl From<String> for EmailAddress {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl From<&str> for EmailAddress {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<&String> for EmailAddress {
    fn from(email: &String) -> Self {
        Self::new(email.clone())
    }
}

fn formatted(addresses: &[EmailAddress]) -> impl Iterator<Item = String> + '_ {
    addresses.iter().map(EmailAddress::format)
}

/// Email destination (recipients).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Destination {
    /// "To" recipients.
    pub to_addresses: Vec<EmailAddress>,
    /// "CC" recipients.
    pub cc_addresses: Vec<EmailAddress>,
    /// "BCC" recipients.
    pub bcc_addresses: Vec<EmailAddress>,
}

impl Destination {
    /// Create a new destination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a "To" recipient.
    pub fn add_to(mut self, email: impl Into<EmailAddress>) -> Self {
        self.to_addresses.push(email.into());
        self
    }

    /// Add a "CC" recipient.
    pub fn add_cc(mut self, email: impl Into<EmailAddress>) -> Self {
        self.cc_addresses.push(email.into());
        self
    }

    /// Add a "BCC" recipient.
    pub fn add_bcc(mut self, email: impl Into<EmailAddress>) -> Self {
        self.bcc_addresses.push(email.into());
        self
    }

    /// Total number of recipients.
    pub fn recipient_count(&self) -> usize {
        self.to_addresses.len() + self.cc_addresses.len() + self.bcc_addresses.len()
    }
}

/// Text with its charset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Content {
    /// The text.
    pub data: String,
    /// Charset of the text.
    pub charset: String,
}

impl Content {
    /// Create content in the default charset.
    pub fn new(data: impl Into<String>) -> Self {
        Self::with_charset(data, DEFAULT_CHARSET)
    }

    /// Create content in a specific charset.
    pub fn with_charset(data: impl Into<String>, charset: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            charset: charset.into(),
        }
    }
}

/// A `SendEmail` request.
///
/// # Examples
///
/// ```rust
/// use ses_archiver::types::SendEmailRequest;
///
/// let request = SendEmailRequest::new(["a@x.com", "b@x.com"], "Hi", "Body", "from@x.com");
/// let params = request.to_params();
///
/// assert_eq!(params.get("Destination.ToAddresses.member.1"), Some("a@x.com"));
/// assert_eq!(params.get("Destination.ToAddresses.member.2"), Some("b@x.com"));
/// assert_eq!(params.get("Message.Subject.Charset"), Some("UTF-8"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendEmailRequest {
    /// Sender address.
    pub source: EmailAddress,
    /// Recipients.
    pub destination: Destination,
    /// Reply-To addresses.
    pub reply_to_addresses: Vec<EmailAddress>,
    /// Subject line.
    pub subject: Content,
    /// Plain text body.
    pub text: Content,
    /// Optional HTML body.
    pub html: Option<Content>,
    /// Address bounces are returned to.
    pub return_path: Option<String>,
}

impl SendEmailRequest {
    /// Create a plain text email to one or more recipients.
    pub fn new<I, A>(
        to: I,
        subject: impl Into<String>,
        body: impl Into<String>,
        source: impl Into<EmailAddress>,
    ) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<EmailAddress>,
    {
        Self {
            source: source.into(),
            destination: Destination {
                to_addresses: to.into_iter().map(Into::into).collect(),
                ..Destination::default()
            },
            reply_to_addresses: Vec::new(),
            subject: Content::new(subject),
            text: Content::new(body),
            html: None,
            return_path: None,
        }
    }

    /// Add an HTML body.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(Content::new(html));
        self
    }

    /// Set the return path.
    pub fn with_return_path(mut self, return_path: impl Into<String>) -> Self {
        self.return_path = Some(return_path.into());
        self
    }

    /// Flatten into query parameters.
    ///
    /// Lists are emitted only when non-empty, as `<key>.member.<n>`.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::for_action(Action::SendEmail);
        params
            .insert("Message.Body.Text.Data", self.text.data.as_str())
            .insert("Source", self.source.format())
            .insert("Message.Subject.Charset", self.subject.charset.as_str())
            .insert("Message.Subject.Data", self.subject.data.as_str())
            .insert("Message.Body.Text.Charset", self.text.charset.as_str());

        if let Some(ref html) = self.html {
            params
                .insert("Message.Body.Html.Charset", html.charset.as_str())
                .insert("Message.Body.Html.Data", html.data.as_str());
        }

        params
            .push_members("Destination.ToAddresses", formatted(&self.destination.to_addresses))
            .push_members("ReplyToAddresses", formatted(&self.reply_to_addresses))
            .push_members("Destination.CcAddresses", formatted(&self.destination.cc_addresses))
            .push_members("Destination.BccAddresses", formatted(&self.destination.bcc_addresses))
            .insert_opt("ReturnPath", self.return_path.as_deref());

        params
    }
}

/// A pre-built MIME message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// The message bytes, headers included.
    pub data: Vec<u8>,
}

impl RawMessage {
    /// Wrap raw bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// The message as sent in `RawMessage.Data`.
    pub fn encoded(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// A `SendRawEmail` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRawEmailRequest {
    /// The MIME message.
    pub raw_message: RawMessage,
    /// Sender address; taken from the message headers when absent.
    pub source: Option<EmailAddress>,
    /// Envelope recipients; taken from the message headers when empty.
    pub destinations: Vec<EmailAddress>,
}

impl SendRawEmailRequest {
    /// Create a request that lets SES read sender and recipients from the message.
    pub fn new(message: impl Into<Vec<u8>>) -> Self {
        Self {
            raw_message: RawMessage::new(message),
            source: None,
            destinations: Vec::new(),
        }
    }

    /// Set the envelope sender.
    pub fn with_source(mut self, source: impl Into<EmailAddress>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add an envelope recipient.
    pub fn add_destination(mut self, destination: impl Into<EmailAddress>) -> Self {
        self.destinations.push(destination.into());
        self
    }

    /// Flatten into query parameters.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::for_action(Action::SendRawEmail);
        params
            .insert("RawMessage.Data", self.raw_message.encoded())
            .insert_opt("Source", self.source.as_ref().map(EmailAddress::format))
            .push_members("Destinations", formatted(&self.destinations));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_email_parameter_order() {
        let request = SendEmailRequest {
            source: EmailAddress::with_name("from@x.com", "Sender"),
            destination: Destination::new()
                .add_to("a@x.com")
                .add_cc("c@x.com")
                .add_bcc("d@x.com"),
            reply_to_addresses: vec![EmailAddress::new("r@x.com")],
            subject: Content::new("Hi"),
            text: Content::new("Body"),
            html: Some(Content::with_charset("<b>Body</b>", "ISO-8859-1")),
            return_path: Some("bounce@x.com".to_string()),
        };

        let params = request.to_params();
        assert_eq!(
            params.keys(),
            vec![
                "Action",
                "Message.Body.Text.Data",
                "Source",
                "Message.Subject.Charset",
                "Message.Subject.Data",
                "Message.Body.Text.Charset",
                "Message.Body.Html.Charset",
                "Message.Body.Html.Data",
                "Destination.ToAddresses.member.1",
                "ReplyToAddresses.member.1",
                "Destination.CcAddresses.member.1",
                "Destination.BccAddresses.member.1",
                "ReturnPath",
            ]
        );
        assert_eq!(params.get("Source"), Some("Sender <from@x.com>"));
        assert_eq!(params.get("Message.Body.Html.Charset"), Some("ISO-8859-1"));
    }

    #[test]
    fn test_send_email_omits_empty_lists() {
        let params = SendEmailRequest::new(["a@x.com"], "Hi", "Body", "from@x.com").to_params();

        assert_eq!(params.len(), 7);
        assert_eq!(params.get("Destination.CcAddresses.member.1"), None);
        assert_eq!(params.get("Message.Body.Html.Data"), None);
        assert_eq!(params.get("ReturnPath"), None);
    }

    #[test]
    fn test_send_raw_email_params() {
        let params = SendRawEmailRequest::new("Subject: hi\r\n\r\nbody")
            .with_source("from@x.com")
            .add_destination("a@x.com")
            .add_destination("b@x.com")
            .to_params();

        assert_eq!(params.action(), Some("SendRawEmail"));
        assert_eq!(
            params.get("RawMessage.Data"),
            Some("U3ViamVjdDogaGkNCg0KYm9keQ==")
        );
        assert_eq!(params.get("Source"), Some("from@x.com"));
        assert_eq!(params.get("Destinations.member.2"), Some("b@x.com"));
    }

    #[test]
    fn test_send_raw_email_minimal() {
        let params = SendRawEmailRequest::new("x").to_params();
        assert_eq!(params.keys(), vec!["Action", "RawMessage.Data"]);
    }

    #[test]
    fn test_destination_recipient_count() {
        let destination = Destination::new().add_to("a@x.com").add_to("b@x.com").add_bcc("c@x.com");
        assert_eq!(destination.recipient_count(), 3);
    }
}
