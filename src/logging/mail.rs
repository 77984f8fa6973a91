//! Log sink that mails buffered records.
//!
//! [`MailSink`] collects records in memory and [`MailSink::flush`] sends
//! them as one message whose subject carries per-priority counts, e.g.
//! `"Script Errors (ERR=1, WARN=2)"`. Clones share one buffer, so a clone
//! can be handed to an [`ErrorReporter`](super::ErrorReporter) while the
//! original is kept for flushing.

use std::collections::BTreeMap;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::{LogError, LogEvent, LogSink, Priority};
use crate::error::{SesError, SesResult};
use crate::mail::{MailMessage, SesMailTransport};
use crate::types::SendEmailResponse;

/// Subject prefix used unless one is set.
pub const DEFAULT_MAIL_SUBJECT: &str = "Script Errors";

#[derive(Debug, Default)]
struct Buffer {
    body: Vec<u8>,
    counts: BTreeMap<Priority, usize>,
}

impl Buffer {
    fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    fn subject(&self, prefix: &str) -> String {
        if self.counts.is_empty() {
            return prefix.to_string();
        }
        let counts: Vec<String> = self
            .counts
            .iter()
            .map(|(priority, n)| format!("{}={}", priority.name(), n))
            .collect();
        format!("{} ({})", prefix, counts.join(", "))
    }

    // Older records go first.
    fn restore(&mut self, mut older: Buffer) {
        older.body.append(&mut self.body);
        for (priority, n) in mem::take(&mut self.counts) {
            *older.counts.entry(priority).or_default() += n;
        }
        *self = older;
    }
}

/// Buffers log records and mails them on [`flush`](MailSink::flush).
///
/// ```rust,no_run
/// use ses_archiver::logging::{ErrorClass, ErrorReporter, MailSink};
/// use ses_archiver::mail::{MailTransportConfig, SesMailTransport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = SesMailTransport::new(MailTransportConfig::new("AKIA...", "secret"))?;
/// let sink = MailSink::new(transport, ["ops@example.com"]).with_from("app@example.com");
///
/// let reporter = ErrorReporter::with_mail(&sink);
/// reporter.report(ErrorClass::Warning, "disk almost full", file!(), line!())?;
///
/// sink.flush().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MailSink {
    transport: SesMailTransport,
    recipients: Vec<String>,
    subject: String,
    from: Option<String>,
    buffer: Arc<Mutex<Buffer>>,
}

impl MailSink {
    /// Create a sink mailing to `recipients` under [`DEFAULT_MAIL_SUBJECT`].
    pub fn new<I, S>(transport: SesMailTransport, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            transport,
            recipients: recipients.into_iter().map(Into::into).collect(),
            subject: DEFAULT_MAIL_SUBJECT.to_string(),
            from: None,
            buffer: Arc::new(Mutex::new(Buffer::default())),
        }
    }

    /// Set the subject prefix.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the `From` header.
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Recipient addresses.
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Whether nothing is waiting to be sent.
    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    fn buffer(&self) -> MutexGuard<'_, Buffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send the buffered records as one message and clear the buffer.
    ///
    /// Returns `Ok(None)` without sending when the buffer is empty. When
    /// sending fails the records are put back ahead of any written since.
    ///
    /// # Errors
    ///
    /// `SesError::Validation` when the sink has no recipients, and any
    /// error of the underlying `SendRawEmail` call.
    pub async fn flush(&self) -> SesResult<Option<SendEmailResponse>> {
        if self.recipients.is_empty() {
            return Err(SesError::Validation {
                message: "At least one recipient is required".to_string(),
                field: Some("recipients".to_string()),
            });
        }

        let pending = mem::take(&mut *self.buffer());
        if pending.is_empty() {
            return Ok(None);
        }

        let mut message = MailMessage::new(
            pending.subject(&self.subject),
            String::from_utf8_lossy(&pending.body),
        );
        if let Some(from) = &self.from {
            message = message.header("From", from.as_str());
        }
        for recipient in &self.recipients {
            message = message.to(recipient.as_str());
        }

        debug!(bytes = pending.body.len(), "Mailing buffered log records");
        match self.transport.send(&message).await {
            Ok(response) => Ok(Some(response)),
            Err(err) => {
                self.buffer().restore(pending);
                Err(err)
            }
        }
    }
}

impl LogSink for MailSink {
    fn append(&mut self, bytes: &[u8]) -> Result<(), LogError> {
        self.buffer().body.extend_from_slice(bytes);
        Ok(())
    }

    fn write_event(&mut self, event: &LogEvent) -> Result<(), LogError> {
        let mut buffer = self.buffer();
        *buffer.counts.entry(event.priority).or_default() += 1;
        buffer.body.extend_from_slice(event.format().as_bytes());
        Ok(())
    }
}
