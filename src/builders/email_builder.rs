//! Email builder for constructing send email requests.

use crate::builders::BuilderError;
use crate::types::{Content, Destination, EmailAddress, SendEmailRequest, DEFAULT_CHARSET};

/// Builder for constructing [`SendEmailRequest`] with a fluent API.
///
/// # Examples
///
/// ```rust
/// use ses_archiver::builders::EmailBuilder;
///
/// let request = EmailBuilder::new()
///     .from("sender@example.com")
///     .to("recipient1@example.com")
///     .to("recipient2@example.com")
///     .cc("cc@example.com")
///     .reply_to("replyto@example.com")
///     .subject("Meeting Invitation")
///     .text("You're invited to our meeting")
///     .return_path("bounces@example.com")
///     .build()?;
///
/// assert_eq!(request.destination.recipient_count(), 3);
/// # Ok::<(), ses_archiver::builders::BuilderError>(())
/// ```
#[derive(Debug, Default)]
pub struct EmailBuilder {
    from: Option<EmailAddress>,
    destination: Destination,
    reply_to: Vec<EmailAddress>,
    subject: Option<String>,
    text_body: Option<String>,
    html_body: Option<String>,
    subject_charset: Option<String>,
    text_charset: Option<String>,
    html_charset: Option<String>,
    return_path: Option<String>,
}

impl EmailBuilder {
    /// Create a new email builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender address.
    pub fn from(mut self, email: impl Into<EmailAddress>) -> Self {
        self.from = Some(email.into());
        self
    }

    /// Add a "To" recipient.
    pub fn to(mut self, email: impl Into<EmailAddress>) -> Self {
        self.destination = self.destination.add_to(email);
        self
    }

    /// Add a "CC" recipient.
    pub fn cc(mut self, email: impl Into<EmailAddress>) -> Self {
        self.destination = self.destination.add_cc(email);
        self
    }

    /// Add a "BCC" recipient.
    pub fn bcc(mut self, email: impl Into<EmailAddress>) -> Self {
        self.destination = self.destination.add_bcc(email);
        self
    }

    /// Add a Reply-To address.
    pub fn reply_to(mut self, email: impl Into<EmailAddress>) -> Self {
        self.reply_to.push(email.into());
        self
    }

    /// Set the subject.
    pub fn subject(mut self, text: impl Into<String>) -> Self {
        self.subject = Some(text.into());
        self
    }

    /// Set the plain text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Set the HTML body.
    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Set the subject charset.
    pub fn subject_charset(mut self, charset: impl Into<String>) -> Self {
        self.subject_charset = Some(charset.into());
        self
    }

    /// Set the text body charset.
    pub fn text_charset(mut self, charset: impl Into<String>) -> Self {
        self.text_charset = Some(charset.into());
        self
    }

    /// Set the HTML body charset.
    pub fn html_charset(mut self, charset: impl Into<String>) -> Self {
        self.html_charset = Some(charset.into());
        self
    }

    /// Set the address bounces are returned to.
    pub fn return_path(mut self, address: impl Into<String>) -> Self {
        self.return_path = Some(address.into());
        self
    }

    /// Build the request.
    ///
    /// # Errors
    ///
    /// - `MissingField` when the sender, recipients, subject or text body
    ///   is absent
    /// - `InvalidValue` when a charset is set to an empty string
    pub fn build(self) -> Result<SendEmailRequest, BuilderError> {
        let source = self
            .from
            .filter(|from| !from.email.is_empty())
            .ok_or_else(|| BuilderError::missing_field("from"))?;

        if self.destination.recipient_count() == 0 {
            return Err(BuilderError::missing_field("recipients"));
        }

        let subject = self
            .subject
            .ok_or_else(|| BuilderError::missing_field("subject"))?;
        let text = self
            .text_body
            .ok_or_else(|| BuilderError::missing_field("text"))?;

        let subject = content(subject, self.subject_charset, "subject_charset")?;
        let text = content(text, self.text_charset, "text_charset")?;
        let html = match self.html_body {
            Some(html) => Some(content(html, self.html_charset, "html_charset")?),
            None => None,
        };

        Ok(SendEmailRequest {
            source,
            destination: self.destination,
            reply_to_addresses: self.reply_to,
            subject,
            text,
            html,
            return_path: self.return_path,
        })
    }
}

fn content(data: String, charset: Option<String>, field: &str) -> Result<Content, BuilderError> {
    match charset {
        Some(charset) if charset.is_empty() => {
            Err(BuilderError::invalid_value(field, "charset must not be empty"))
        }
        Some(charset) => Ok(Content::with_charset(data, charset)),
        None => Ok(Content::with_charset(data, DEFAULT_CHARSET)),
    }
}
