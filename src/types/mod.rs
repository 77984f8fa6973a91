//! Types for the SES classic query API.
//!
//! Requests know how to flatten themselves into [`QueryParams`]; responses
//! carry the plain string fields SES returns.
//!
//! [`QueryParams`]: crate::http::QueryParams

mod email;
mod responses;

pub use email::*;
pub use responses::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query API actions supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Send a formatted email.
    SendEmail,
    /// Send a pre-built MIME message.
    SendRawEmail,
    /// List addresses verified for sending.
    ListVerifiedEmailAddresses,
    /// Start verification of an address.
    VerifyEmailAddress,
    /// Remove an address from the verified list.
    DeleteVerifiedEmailAddress,
    /// Read the account's sending limits.
    GetSendQuota,
    /// Read the account's sending statistics.
    GetSendStatistics,
}

impl Action {
    /// Every supported action.
    pub const ALL: [Action; 7] = [
        Action::SendEmail,
        Action::SendRawEmail,
        Action::ListVerifiedEmailAddresses,
        Action::VerifyEmailAddress,
        Action::DeleteVerifiedEmailAddress,
        Action::GetSendQuota,
        Action::GetSendStatistics,
    ];

    /// The action name as sent in the `Action` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::SendEmail => "SendEmail",
            Action::SendRawEmail => "SendRawEmail",
            Action::ListVerifiedEmailAddresses => "ListVerifiedEmailAddresses",
            Action::VerifyEmailAddress => "VerifyEmailAddress",
            Action::DeleteVerifiedEmailAddress => "DeleteVerifiedEmailAddress",
            Action::GetSendQuota => "GetSendQuota",
            Action::GetSendStatistics => "GetSendStatistics",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
