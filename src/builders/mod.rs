//! Builders for constructing SES requests.
//!
//! # Examples
//!
//! ```rust
//! use ses_archiver::builders::EmailBuilder;
//!
//! let request = EmailBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello World")
//!     .text("This is a plain text email")
//!     .html("<p>This is an HTML email</p>")
//!     .build()?;
//! # Ok::<(), ses_archiver::builders::BuilderError>(())
//! ```

mod email_builder;

pub use email_builder::EmailBuilder;

use thiserror::Error;

/// Error type for builder operations.
///
/// Returned when a builder's `build()` method is called while the builder
/// is missing required fields or holds invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A required field is missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A field has an invalid value.
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue {
        /// The name of the field with the invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

impl BuilderError {
    /// Create a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_error_missing_field() {
        let error = BuilderError::missing_field("from");
        assert_eq!(error.to_string(), "Missing required field: from");
    }

    #[test]
    fn test_builder_error_invalid_value() {
        let error = BuilderError::invalid_value("charset", "must not be empty");
        assert_eq!(error.to_string(), "Invalid value for field 'charset': must not be empty");
    }
}
