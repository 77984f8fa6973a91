//! Credential error types.

use thiserror::Error;

/// Errors that can occur while resolving credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Required credentials are missing.
    #[error("Missing credentials: {message}")]
    Missing {
        /// Details about which credentials are missing.
        message: String,
    },

    /// Credentials are present but unusable.
    #[error("Invalid credentials: {message}")]
    Invalid {
        /// Details about why the credentials are invalid.
        message: String,
    },
}
