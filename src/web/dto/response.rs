//! Response DTOs for Web API.

use serde::Serialize;

use crate::contact::IssuedChallenge;
use crate::mail::DeliveryReceipt;

/// Successful contact submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    /// Always `true`.
    pub ok: bool,
    /// Message-ID of the relayed message, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl From<DeliveryReceipt> for ContactResponse {
    fn from(receipt: DeliveryReceipt) -> Self {
        Self {
            ok: true,
            id: receipt.message_id,
        }
    }
}

/// Freshly issued arithmetic challenge.
#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    /// First operand.
    pub a: i64,
    /// Second operand.
    pub b: i64,
    /// Signed token to echo back as `antibot.token`.
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

impl From<IssuedChallenge> for ChallengeResponse {
    fn from(challenge: IssuedChallenge) -> Self {
        Self {
            a: challenge.a,
            b: challenge.b,
            token: challenge.token,
            expires_in: challenge.expires_in,
        }
    }
}
