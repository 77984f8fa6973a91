//! Response types for SES query API operations.
//!
//! SES returns numbers as decimal strings (`"200.0"`); they are kept as
//! strings so nothing is lost in conversion.

use serde::{Deserialize, Serialize};

/// Response from sending an email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendEmailResponse {
    /// Message ID assigned by SES.
    pub message_id: String,
}

/// Sending limits of the account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendQuota {
    /// Emails sent during the previous 24 hours.
    #[serde(rename = "SentLast24Hours")]
    pub sent_last_24_hours: String,
    /// Maximum emails per 24-hour period.
    #[serde(rename = "Max24HourSend")]
    pub max_24_hour_send: String,
    /// Maximum emails per second.
    pub max_send_rate: String,
}

/// One 15-minute bucket of sending activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendDataPoint {
    /// Messages attempted.
    pub delivery_attempts: String,
    /// Start of the bucket.
    pub timestamp: String,
    /// Messages rejected by SES.
    pub rejects: String,
    /// Messages that bounced.
    pub bounces: String,
    /// Complaints received.
    pub complaints: String,
}
