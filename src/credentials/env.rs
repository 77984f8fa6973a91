//! Environment variable credentials provider.

use super::{AwsCredentials, CredentialProvider};
use crate::credentials::error::CredentialError;
use async_trait::async_trait;
use std::env;

/// Environment variable holding the access key ID.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable holding an optional session token.
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Credentials provider that reads from environment variables.
///
/// The variables are read on every call, so rotated keys are picked up
/// without rebuilding the client.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentCredentialProvider;

impl EnvironmentCredentialProvider {
    /// Create a new environment credentials provider.
    pub fn new() -> Self {
        Self
    }

    /// Read the credentials synchronously.
    pub fn load(&self) -> Result<AwsCredentials, CredentialError> {
        let access_key_id = required_var(AWS_ACCESS_KEY_ID)?;
        let secret_access_key = required_var(AWS_SECRET_ACCESS_KEY)?;

        let credentials = AwsCredentials::new(access_key_id, secret_access_key);

        match env::var(AWS_SESSION_TOKEN).ok().filter(|s| !s.is_empty()) {
            Some(token) => Ok(credentials.with_session_token(token)),
            None => Ok(credentials),
        }
    }
}

fn required_var(name: &str) -> Result<String, CredentialError> {
    let value = env::var(name).map_err(|_| CredentialError::Missing {
        message: format!("{} environment variable not set", name),
    })?;

    if value.is_empty() {
        return Err(CredentialError::Invalid {
            message: format!("{} is empty", name),
        });
    }

    Ok(value)
}

#[async_trait]
impl CredentialProvider for EnvironmentCredentialProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError> {
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the process-wide variables are never touched concurrently.
    #[test]
    fn test_environment_provider_lifecycle() {
        let originals: Vec<_> = [AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_SESSION_TOKEN]
            .iter()
            .map(|k| (*k, env::var(*k).ok()))
            .collect();

        env::remove_var(AWS_ACCESS_KEY_ID);
        env::remove_var(AWS_SECRET_ACCESS_KEY);
        env::remove_var(AWS_SESSION_TOKEN);
        let provider = EnvironmentCredentialProvider::new();
        assert!(matches!(provider.load(), Err(CredentialError::Missing { .. })));

        env::set_var(AWS_ACCESS_KEY_ID, "AKID");
        env::set_var(AWS_SECRET_ACCESS_KEY, "");
        assert!(matches!(provider.load(), Err(CredentialError::Invalid { .. })));

        env::set_var(AWS_SECRET_ACCESS_KEY, "SECRET");
        env::set_var(AWS_SESSION_TOKEN, "TOKEN");
        let creds = provider.load().unwrap();
        assert_eq!(creds.access_key_id(), "AKID");
        assert_eq!(creds.secret_access_key(), "SECRET");
        assert_eq!(creds.session_token(), Some("TOKEN"));

        for (key, original) in originals {
            match original {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}
