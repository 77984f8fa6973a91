//! Error-to-log bridge.
//!
//! [`ErrorReporter`] turns `(class, message, file, line)` reports into log
//! records. Each [`ErrorClass`] maps to a [`Priority`] and a display name;
//! reports for unmapped classes are dropped. Records are emitted as
//! `tracing` events and, when a sink is attached, appended to it as
//! [`LogEvent`]s.
//!
//! Nothing is registered globally on construction. Panic capture is opt-in
//! through [`ErrorReporter::install_panic_hook`].

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, PanicHookInfo};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread;
use tracing::{debug, error, info, warn};

use super::{LogError, LogEvent, LogSink, MailSink, Priority};

/// Classes of reported errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Fatal run-time error.
    Error,
    /// Run-time warning.
    Warning,
    /// Parse error.
    Parse,
    /// Run-time notice.
    Notice,
    /// Fatal start-up error.
    CoreError,
    /// Start-up warning.
    CoreWarning,
    /// Fatal compile-time error.
    CompileError,
    /// Compile-time warning.
    CompileWarning,
    /// User-raised error.
    UserError,
    /// User-raised warning.
    UserWarning,
    /// User-raised notice.
    UserNotice,
    /// Code style suggestion.
    Strict,
    /// Catchable fatal error.
    RecoverableError,
    /// Use of a deprecated feature.
    Deprecated,
    /// User-raised deprecation.
    UserDeprecated,
}

impl ErrorClass {
    /// Every class.
    pub const ALL: [ErrorClass; 15] = [
        ErrorClass::Error,
        ErrorClass::Warning,
        ErrorClass::Parse,
        ErrorClass::Notice,
        ErrorClass::CoreError,
        ErrorClass::CoreWarning,
        ErrorClass::CompileError,
        ErrorClass::CompileWarning,
        ErrorClass::UserError,
        ErrorClass::UserWarning,
        ErrorClass::UserNotice,
        ErrorClass::Strict,
        ErrorClass::RecoverableError,
        ErrorClass::Deprecated,
        ErrorClass::UserDeprecated,
    ];

    /// Stable display name.
    pub fn name(self) -> &'static str {
        match self {
            ErrorClass::Error => "E_ERROR",
            ErrorClass::Warning => "E_WARNING",
            ErrorClass::Parse => "E_PARSE",
            ErrorClass::Notice => "E_NOTICE",
            ErrorClass::CoreError => "E_CORE_ERROR",
            ErrorClass::CoreWarning => "E_CORE_WARNING",
            ErrorClass::CompileError => "E_COMPILE_ERROR",
            ErrorClass::CompileWarning => "E_COMPILE_WARNING",
            ErrorClass::UserError => "E_USER_ERROR",
            ErrorClass::UserWarning => "E_USER_WARNING",
            ErrorClass::UserNotice => "E_USER_NOTICE",
            ErrorClass::Strict => "E_STRICT",
            ErrorClass::RecoverableError => "E_RECOVERABLE_ERROR",
            ErrorClass::Deprecated => "E_DEPRECATED",
            ErrorClass::UserDeprecated => "E_USER_DEPRECATED",
        }
    }

    /// Classes that end the program; only these are reported at shutdown.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            ErrorClass::Error
                | ErrorClass::Parse
                | ErrorClass::CoreError
                | ErrorClass::CompileError
        )
    }

    fn default_priority(self) -> Option<Priority> {
        let priority = match self {
            ErrorClass::Error
            | ErrorClass::CoreError
            | ErrorClass::CompileError
            | ErrorClass::UserError
            | ErrorClass::RecoverableError => Priority::Err,
            ErrorClass::Warning
            | ErrorClass::CoreWarning
            | ErrorClass::CompileWarning
            | ErrorClass::UserWarning
            | ErrorClass::Deprecated
            | ErrorClass::UserDeprecated => Priority::Warn,
            ErrorClass::Parse => Priority::Crit,
            ErrorClass::Notice | ErrorClass::UserNotice => Priority::Notice,
            ErrorClass::Strict => return None,
        };
        Some(priority)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
struct Mapping {
    priority: Priority,
    name: String,
}

type Sink = Box<dyn LogSink + Send>;

/// Maps error classes to priorities and writes the resulting records.
///
/// ```rust
/// use ses_archiver::logging::{ErrorClass, ErrorReporter};
///
/// let reporter = ErrorReporter::new();
/// assert_eq!(
///     reporter.format_record(ErrorClass::Warning, "boom", "src/main.rs", 10).as_deref(),
///     Some("[src/main.rs:10] E_WARNING, boom"),
/// );
/// assert_eq!(reporter.format_record(ErrorClass::Strict, "style", "src/main.rs", 1), None);
/// ```
pub struct ErrorReporter {
    mappings: RwLock<HashMap<ErrorClass, Mapping>>,
    sink: Mutex<Option<Sink>>,
}

impl ErrorReporter {
    /// Create a reporter with the default mapping and no sink.
    ///
    /// Errors map to `Err`, warnings and deprecations to `Warn`, parse
    /// errors to `Crit`, notices to `Notice`. `Strict` is left unmapped.
    pub fn new() -> Self {
        let mappings = ErrorClass::ALL
            .iter()
            .filter_map(|class| {
                class.default_priority().map(|priority| {
                    (
                        *class,
                        Mapping {
                            priority,
                            name: class.name().to_string(),
                        },
                    )
                })
            })
            .collect();

        Self {
            mappings: RwLock::new(mappings),
            sink: Mutex::new(None),
        }
    }

    /// Create a reporter that also appends records to `sink`.
    pub fn with_sink(sink: impl LogSink + Send + 'static) -> Self {
        let reporter = Self::new();
        reporter.set_sink(sink);
        reporter
    }

    /// Create a reporter whose records are buffered in `mail`.
    ///
    /// The reporter writes into a clone sharing `mail`'s buffer; call
    /// [`MailSink::flush`] on `mail` to send them.
    pub fn with_mail(mail: &MailSink) -> Self {
        Self::with_sink(mail.clone())
    }

    /// Replace the attached sink.
    pub fn set_sink(&self, sink: impl LogSink + Send + 'static) {
        *self.sink() = Some(Box::new(sink));
    }

    /// Detach and return the sink.
    pub fn take_sink(&self) -> Option<Box<dyn LogSink + Send>> {
        self.sink().take()
    }

    fn sink(&self) -> MutexGuard<'_, Option<Sink>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Map `class` to `priority`, optionally under a custom display name.
    pub fn add_mapping(&self, class: ErrorClass, priority: Priority, name: Option<&str>) {
        let name = name.unwrap_or(class.name()).to_string();
        self.mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class, Mapping { priority, name });
    }

    /// Stop reporting `class`.
    pub fn remove_mapping(&self, class: ErrorClass) {
        self.mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&class);
    }

    /// Priority `class` is reported at, if mapped.
    pub fn priority_for(&self, class: ErrorClass) -> Option<Priority> {
        self.mapping(class).map(|m| m.priority)
    }

    fn mapping(&self, class: ErrorClass) -> Option<Mapping> {
        self.mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&class)
            .cloned()
    }

    /// Render the record for a report, or `None` if `class` is unmapped.
    pub fn format_record(
        &self,
        class: ErrorClass,
        message: &str,
        file: &str,
        line: u32,
    ) -> Option<String> {
        self.mapping(class)
            .map(|m| format!("[{}:{}] {}, {}", file, line, m.name, message))
    }

    /// Report an error.
    ///
    /// Returns `Ok(false)` when `class` is unmapped and nothing was written.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if appending the record fails.
    pub fn report(
        &self,
        class: ErrorClass,
        message: &str,
        file: &str,
        line: u32,
    ) -> Result<bool, LogError> {
        let Some(mapping) = self.mapping(class) else {
            return Ok(false);
        };
        let record = format!("[{}:{}] {}, {}", file, line, mapping.name, message);

        match mapping.priority {
            Priority::Emerg | Priority::Alert | Priority::Crit | Priority::Err => {
                error!(class = %class, priority = %mapping.priority, "{}", record)
            }
            Priority::Warn => warn!(class = %class, priority = %mapping.priority, "{}", record),
            Priority::Notice | Priority::Info => {
                info!(class = %class, priority = %mapping.priority, "{}", record)
            }
            Priority::Debug => debug!(class = %class, priority = %mapping.priority, "{}", record),
        }

        if let Some(sink) = self.sink().as_mut() {
            sink.write_event(&LogEvent::new(mapping.priority, record))?;
        }
        Ok(true)
    }

    /// Report a panic as an `E_ERROR` record.
    pub fn report_panic(&self, info: &PanicHookInfo<'_>) -> Result<bool, LogError> {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("Box<dyn Any>");
        let (file, line) = info
            .location()
            .map(|l| (l.file(), l.line()))
            .unwrap_or(("<unknown>", 0));

        self.report(ErrorClass::Error, message, file, line)
    }

    /// Install a panic hook that reports panics before running the
    /// previously installed hook.
    ///
    /// The previous hook is restored when the guard is dropped.
    pub fn install_panic_hook(self: &Arc<Self>) -> PanicHookGuard {
        let previous: Arc<PanicHook> = Arc::from(panic::take_hook());

        let reporter = Arc::clone(self);
        let chained = Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            // A failing sink must not mask the panic itself.
            let _ = reporter.report_panic(info);
            chained(info);
        }));

        PanicHookGuard { previous }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mapped = self
            .mappings
            .read()
            .map(|m| m.len())
            .unwrap_or_default();
        f.debug_struct("ErrorReporter")
            .field("mapped_classes", &mapped)
            .field("has_sink", &self.sink().is_some())
            .finish()
    }
}

type PanicHook = dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static;

/// Restores the previous panic hook on drop.
#[must_use = "the panic hook is removed when the guard is dropped"]
pub struct PanicHookGuard {
    previous: Arc<PanicHook>,
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        // The hook cannot be swapped from a panicking thread.
        if thread::panicking() {
            return;
        }
        let previous = Arc::clone(&self.previous);
        let _ = panic::take_hook();
        panic::set_hook(Box::new(move |info| previous(info)));
    }
}

impl fmt::Debug for PanicHookGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicHookGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl LogSink for SharedSink {
        fn append(&mut self, bytes: &[u8]) -> Result<(), LogError> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(())
        }
    }

    #[test]
    fn test_default_priorities() {
        let reporter = ErrorReporter::new();

        assert_eq!(reporter.priority_for(ErrorClass::Error), Some(Priority::Err));
        assert_eq!(reporter.priority_for(ErrorClass::Warning), Some(Priority::Warn));
        assert_eq!(reporter.priority_for(ErrorClass::Parse), Some(Priority::Crit));
        assert_eq!(reporter.priority_for(ErrorClass::Notice), Some(Priority::Notice));
        assert_eq!(reporter.priority_for(ErrorClass::UserNotice), Some(Priority::Notice));
        assert_eq!(reporter.priority_for(ErrorClass::RecoverableError), Some(Priority::Err));
        assert_eq!(reporter.priority_for(ErrorClass::Strict), None);
    }

    #[test]
    fn test_deprecations_have_own_entries() {
        let reporter = ErrorReporter::new();

        assert_eq!(
            reporter.format_record(ErrorClass::Deprecated, "old api", "a.rs", 1).as_deref(),
            Some("[a.rs:1] E_DEPRECATED, old api")
        );
        assert_eq!(
            reporter.format_record(ErrorClass::UserDeprecated, "old api", "a.rs", 2).as_deref(),
            Some("[a.rs:2] E_USER_DEPRECATED, old api")
        );
    }

    #[test]
    fn test_report_writes_to_sink() {
        let sink = SharedSink::default();
        let reporter = ErrorReporter::with_sink(sink.clone());

        assert!(reporter.report(ErrorClass::Warning, "boom", "src/main.rs", 10).unwrap());

        let out = sink.contents();
        assert!(out.ends_with(" WARN (4): [src/main.rs:10] E_WARNING, boom\n"), "{out}");
    }

    #[test]
    fn test_unmapped_class_is_ignored() {
        let sink = SharedSink::default();
        let reporter = ErrorReporter::with_sink(sink.clone());

        assert!(!reporter.report(ErrorClass::Strict, "style", "src/lib.rs", 3).unwrap());
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn test_custom_mapping() {
        let reporter = ErrorReporter::new();
        reporter.add_mapping(ErrorClass::Strict, Priority::Debug, Some("STRICT"));
        reporter.remove_mapping(ErrorClass::Notice);

        assert_eq!(
            reporter.format_record(ErrorClass::Strict, "x", "f.rs", 5).as_deref(),
            Some("[f.rs:5] STRICT, x")
        );
        assert_eq!(reporter.format_record(ErrorClass::Notice, "x", "f.rs", 5), None);
    }

    #[test]
    fn test_fatal_classes() {
        let fatal: Vec<_> = ErrorClass::ALL.iter().filter(|c| c.is_fatal()).collect();
        assert_eq!(
            fatal,
            [
                &ErrorClass::Error,
                &ErrorClass::Parse,
                &ErrorClass::CoreError,
                &ErrorClass::CompileError
            ]
        );
    }

    #[test]
    fn test_panic_hook_reports_panics() {
        let sink = SharedSink::default();
        let reporter = Arc::new(ErrorReporter::with_sink(sink.clone()));

        let guard = reporter.install_panic_hook();
        let result = thread::spawn(|| panic!("worker failed")).join();
        drop(guard);

        assert!(result.is_err());
        let out = sink.contents();
        assert!(out.contains(" ERR (3): ["), "{out}");
        assert!(out.contains("] E_ERROR, worker failed"), "{out}");
    }
}
