//! Log output: an archiving file writer and an error reporter.
//!
//! - [`ArchiveWriter`] appends to `<dir>/<prefix><date><suffix>` and, with
//!   size rotation enabled, renames the file to the smallest free
//!   `<prefix><date>.<n><suffix>` once it reaches the size limit.
//! - [`ErrorReporter`] maps error classes to [`Priority`] levels and writes
//!   `"[file:line] NAME, message"` records through `tracing` and an optional
//!   [`LogSink`].
//! - [`MailSink`] buffers records and mails them in one message on an
//!   async flush.
//!
//! Both are synchronous. The writer implements `std::io::Write`, so a
//! `Mutex<ArchiveWriter>` can back a `tracing-subscriber` fmt layer; the
//! write path emits no `tracing` events of its own.

mod archiver;
mod error;
mod mail;
mod reporter;

pub use archiver::{
    ArchiveWriter, ArchiverConfig, ArchiverConfigBuilder, RotationFlags, DEFAULT_DATE_MASK,
    DEFAULT_MAX_ARCHIVE_INDEX, DEFAULT_MAX_SIZE, DEFAULT_SUFFIX,
};
pub use error::LogError;
pub use mail::{MailSink, DEFAULT_MAIL_SUBJECT};
pub use reporter::{ErrorClass, ErrorReporter, PanicHookGuard};

use chrono::{DateTime, FixedOffset, Local};
use std::fmt;

/// Syslog-ordered log priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// System is unusable.
    Emerg = 0,
    /// Action must be taken immediately.
    Alert = 1,
    /// Critical conditions.
    Crit = 2,
    /// Error conditions.
    Err = 3,
    /// Warning conditions.
    Warn = 4,
    /// Normal but significant.
    Notice = 5,
    /// Informational.
    Info = 6,
    /// Debug messages.
    Debug = 7,
}

impl Priority {
    /// Numeric value, 0 (most severe) to 7.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Upper-case name used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            Priority::Emerg => "EMERG",
            Priority::Alert => "ALERT",
            Priority::Crit => "CRIT",
            Priority::Err => "ERR",
            Priority::Warn => "WARN",
            Priority::Notice => "NOTICE",
            Priority::Info => "INFO",
            Priority::Debug => "DEBUG",
        }
    }

    /// The closest `tracing` level.
    pub fn tracing_level(self) -> tracing::Level {
        match self {
            Priority::Emerg | Priority::Alert | Priority::Crit | Priority::Err => {
                tracing::Level::ERROR
            }
            Priority::Warn => tracing::Level::WARN,
            Priority::Notice | Priority::Info => tracing::Level::INFO,
            Priority::Debug => tracing::Level::DEBUG,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// When the event happened.
    pub timestamp: DateTime<FixedOffset>,
    /// Severity.
    pub priority: Priority,
    /// Message text.
    pub message: String,
}

impl LogEvent {
    /// Create an event stamped with the current local time.
    pub fn new(priority: Priority, message: impl Into<String>) -> Self {
        Self::at(Local::now().into(), priority, message)
    }

    /// Create an event with an explicit timestamp.
    pub fn at(timestamp: DateTime<FixedOffset>, priority: Priority, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            priority,
            message: message.into(),
        }
    }

    /// Render as `"{timestamp} {NAME} ({value}): {message}\n"`.
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use ses_archiver::logging::{LogEvent, Priority};
    ///
    /// let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap().fixed_offset();
    /// let event = LogEvent::at(ts, Priority::Warn, "disk almost full");
    ///
    /// assert_eq!(event.format(), "2024-01-02T03:04:05+00:00 WARN (4): disk almost full\n");
    /// ```
    pub fn format(&self) -> String {
        format!(
            "{} {} ({}): {}\n",
            self.timestamp.to_rfc3339(),
            self.priority.name(),
            self.priority.value(),
            self.message
        )
    }
}

/// Append-only destination for log output.
pub trait LogSink {
    /// Append raw bytes.
    fn append(&mut self, bytes: &[u8]) -> Result<(), LogError>;

    /// Append a formatted event.
    fn write_event(&mut self, event: &LogEvent) -> Result<(), LogError> {
        self.append(event.format().as_bytes())
    }
}

impl LogSink for Vec<u8> {
    fn append(&mut self, bytes: &[u8]) -> Result<(), LogError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_priority_order_and_names() {
        assert!(Priority::Emerg < Priority::Debug);
        assert_eq!(Priority::Err.value(), 3);
        assert_eq!(Priority::Notice.to_string(), "NOTICE");
        assert_eq!(Priority::Crit.tracing_level(), tracing::Level::ERROR);
        assert_eq!(Priority::Notice.tracing_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_vec_sink_collects_events() {
        let ts = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2011, 6, 7, 20, 32, 5)
            .unwrap();
        let mut sink = Vec::new();

        sink.write_event(&LogEvent::at(ts, Priority::Info, "hello")).unwrap();

        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "2011-06-07T20:32:05+01:00 INFO (6): hello\n"
        );
    }
}
