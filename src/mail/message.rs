//! Outbound message types.

use lettre::message::Mailbox;
use lettre::Address;
use serde::Serialize;

use super::MailError;

/// An address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailAddress {
    /// Display name.
    pub name: Option<String>,
    /// Bare email address.
    pub email: String,
}

impl MailAddress {
    /// Create an address with a display name.
    pub fn named(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Create an address without a display name.
    pub fn bare(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Convert into a lettre mailbox.
    pub fn to_mailbox(&self) -> Result<Mailbox, MailError> {
        let address: Address = self
            .email
            .parse()
            .map_err(|_| MailError::InvalidAddress(self.email.clone()))?;
        Ok(Mailbox::new(self.name.clone(), address))
    }
}

/// A composed message ready to send.
///
/// Built once per submission by the composer: headers are free of line
/// breaks and `html_body` only contains escaped user input.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    /// `Message-ID` header value, including angle brackets.
    pub message_id: String,
    /// Sender. Always an address the transport account may send as.
    pub from: MailAddress,
    /// Configured recipient.
    pub to: MailAddress,
    /// Visitor's address, so replies reach them.
    pub reply_to: MailAddress,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text_body: String,
    /// HTML body.
    pub html_body: String,
}

/// Acknowledgement returned by a mailer after a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    /// Identifier of the delivered message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}
