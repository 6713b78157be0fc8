//! Outbound mail for contact-relay.
//!
//! This module provides:
//! - [`TransportConfig`], the immutable SMTP settings loaded at startup
//! - [`OutboundMessage`], a composed message ready for delivery
//! - the [`Mailer`] trait with an SMTP implementation backed by lettre and an
//!   in-memory implementation used by tests
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `SMTP_HOST` | Yes | SMTP server hostname |
//! | `SMTP_PORT` | Yes | SMTP server port |
//! | `SMTP_SECURE` | No | `true` for implicit TLS, otherwise STARTTLS when offered |
//! | `SMTP_USER` | Yes | Username for authentication |
//! | `SMTP_PASS` | Yes | Password for authentication |
//! | `MAIL_TO` | Yes | Inbox receiving the contact messages |
//! | `MAIL_FROM` | No | Sender address (defaults to `SMTP_USER`) |
//! | `MAIL_FROM_NAME` | No | Sender display name |
//! | `SMTP_TIMEOUT_SECS` | No | Delivery timeout (default: 10) |

mod mailer;
mod memory;
mod message;
mod transport;

pub use mailer::{Mailer, SmtpMailer};
pub use memory::MemoryMailer;
pub use message::{DeliveryReceipt, MailAddress, OutboundMessage};
pub use transport::{SmtpSettings, TransportConfig};

use thiserror::Error;

/// Errors raised while building or delivering a message.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required config: {0}")]
    MissingConfig(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("delivery timed out after {0}s")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_error_display() {
        let err = MailError::MissingConfig("host, password".to_string());
        assert_eq!(err.to_string(), "missing required config: host, password");

        let err = MailError::Timeout(10);
        assert_eq!(err.to_string(), "delivery timed out after 10s");
    }
}
