//! Account-level quota and statistics.

use std::sync::Arc;

use crate::error::SesResult;
use crate::http::{HttpClient, QueryParams};
use crate::types::{Action, SendDataPoint, SendQuota};
use crate::xml;
use super::SesService;

/// Service for account-level operations.
#[derive(Clone)]
pub struct AccountService {
    http_client: Arc<dyn HttpClient>,
}

impl AccountService {
    /// Create a new account service.
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Get the sending limits of the account.
    pub async fn get_send_quota(&self) -> SesResult<SendQuota> {
        let response = self
            .http_client
            .execute(QueryParams::for_action(Action::GetSendQuota))
            .await?;
        xml::parse_send_quota(&response.text())
    }

    /// Get the first data point of the account's sending statistics.
    ///
    /// A response without data points yields a point with empty fields.
    pub async fn get_send_statistics(&self) -> SesResult<SendDataPoint> {
        let points = self.get_send_statistics_all().await?;
        Ok(points.into_iter().next().unwrap_or_default())
    }

    /// Get every data point of the account's sending statistics.
    pub async fn get_send_statistics_all(&self) -> SesResult<Vec<SendDataPoint>> {
        let response = self
            .http_client
            .execute(QueryParams::for_action(Action::GetSendStatistics))
            .await?;
        xml::parse_send_statistics(&response.text())
    }
}

impl SesService for AccountService {
    fn http_client(&self) -> &Arc<dyn HttpClient> {
        &self.http_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::SesHttpClient;
    use crate::mocks::{MockResponse, MockTransport, TestFixtures};

    fn service(transport: Arc<MockTransport>) -> AccountService {
        AccountService::new(Arc::new(SesHttpClient::with_transport(
            TestFixtures::config(),
            transport,
        )))
    }

    #[tokio::test]
    async fn test_get_send_quota() {
        let transport = Arc::new(MockTransport::with_default(MockResponse::ok_with_body(
            TestFixtures::send_quota_xml(),
        )));

        let quota = service(transport).get_send_quota().await.unwrap();

        assert_eq!(quota.sent_last_24_hours, "127.0");
        assert_eq!(quota.max_24_hour_send, "200.0");
        assert_eq!(quota.max_send_rate, "1.0");
    }

    #[tokio::test]
    async fn test_get_send_statistics_first_and_all() {
        let transport = Arc::new(MockTransport::with_default(MockResponse::ok_with_body(
            TestFixtures::send_statistics_xml(),
        )));
        let service = service(transport);

        let first = service.get_send_statistics().await.unwrap();
        assert_eq!(first.delivery_attempts, "8");
        assert_eq!(first.timestamp, "2011-08-03T19:23:00Z");

        let all = service.get_send_statistics_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].bounces, "1");
    }

    #[tokio::test]
    async fn test_statistics_without_points_is_empty() {
        let transport = Arc::new(MockTransport::with_default(MockResponse::ok_with_body(
            "<GetSendStatisticsResponse><GetSendStatisticsResult><SendDataPoints/>\
             </GetSendStatisticsResult></GetSendStatisticsResponse>",
        )));

        let point = service(transport).get_send_statistics().await.unwrap();
        assert_eq!(point, SendDataPoint::default());
    }
}
