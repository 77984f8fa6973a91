//! Verified email address operations.

use std::sync::Arc;
use tracing::info;

use crate::builders::BuilderError;
use crate::error::SesResult;
use crate::http::{HttpClient, QueryParams};
use crate::types::Action;
use crate::xml;
use super::SesService;

/// Service for managing the addresses SES allows as senders.
#[derive(Clone)]
pub struct IdentityService {
    http_client: Arc<dyn HttpClient>,
}

impl IdentityService {
    /// Create a new identity service.
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// List the verified email addresses.
    pub async fn list_verified_email_addresses(&self) -> SesResult<Vec<String>> {
        let params = QueryParams::for_action(Action::ListVerifiedEmailAddresses);
        let response = self.http_client.execute(params).await?;
        xml::parse_verified_addresses(&response.text())
    }

    /// Ask SES to send a verification message to `email`.
    pub async fn verify_email_address(&self, email: &str) -> SesResult<()> {
        self.address_call(Action::VerifyEmailAddress, email).await?;
        info!(email = %email, "Verification requested");
        Ok(())
    }

    /// Remove `email` from the verified list.
    pub async fn delete_verified_email_address(&self, email: &str) -> SesResult<()> {
        self.address_call(Action::DeleteVerifiedEmailAddress, email).await?;
        info!(email = %email, "Verified address deleted");
        Ok(())
    }

    async fn address_call(&self, action: Action, email: &str) -> SesResult<()> {
        if email.is_empty() {
            return Err(BuilderError::missing_field("email_address").into());
        }

        let mut params = QueryParams::for_action(action);
        params.insert("EmailAddress", email);
        self.http_client.execute(params).await?;
        Ok(())
    }
}

impl SesService for IdentityService {
    fn http_client(&self) -> &Arc<dyn HttpClient> {
        &self.http_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::SesHttpClient;
    use crate::mocks::{MockResponse, MockTransport, TestFixtures};

    fn service(transport: Arc<MockTransport>) -> IdentityService {
        IdentityService::new(Arc::new(SesHttpClient::with_transport(
            TestFixtures::config(),
            transport,
        )))
    }

    #[tokio::test]
    async fn test_list_verified_email_addresses() {
        let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::ok_with_body(
            TestFixtures::list_verified_xml(&["a@x.com", "b@x.com"]),
        )]));
        let service = service(transport.clone());

        let addresses = service.list_verified_email_addresses().await.unwrap();

        assert_eq!(addresses, vec!["a@x.com".to_string(), "b@x.com".to_string()]);
        assert_eq!(
            transport.last_request().unwrap().form_params(),
            vec![("Action".to_string(), "ListVerifiedEmailAddresses".to_string())]
        );
    }

    #[tokio::test]
    async fn test_verify_and_delete() {
        let transport = Arc::new(MockTransport::with_responses(vec![
            MockResponse::ok_with_body(TestFixtures::empty_result_xml("VerifyEmailAddress")),
            MockResponse::ok_with_body(TestFixtures::empty_result_xml("DeleteVerifiedEmailAddress")),
        ]));
        let service = service(transport.clone());

        service.verify_email_address("new@x.com").await.unwrap();
        service.delete_verified_email_address("old@x.com").await.unwrap();

        let requests = transport.requests();
        assert_eq!(
            requests[0].form_params(),
            vec![
                ("Action".to_string(), "VerifyEmailAddress".to_string()),
                ("EmailAddress".to_string(), "new@x.com".to_string()),
            ]
        );
        assert_eq!(
            requests[1].form_params(),
            vec![
                ("Action".to_string(), "DeleteVerifiedEmailAddress".to_string()),
                ("EmailAddress".to_string(), "old@x.com".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_address_rejected() {
        let transport = Arc::new(MockTransport::new());
        let service = service(transport.clone());

        assert!(service.verify_email_address("").await.is_err());
        assert_eq!(transport.request_count(), 0);
    }
}
