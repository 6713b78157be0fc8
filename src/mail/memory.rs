//! In-memory mailer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::{DeliveryReceipt, MailError, Mailer, OutboundMessage};

/// Mailer that keeps messages in memory instead of delivering them.
///
/// Clones share the same mailbox, so a test can hand one clone to the
/// service and inspect the other.
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    attempts: Arc<AtomicUsize>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl MemoryMailer {
    /// Create an empty mailer that accepts every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mailer whose sends always fail with the given SMTP error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Wait this long before completing each send.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of times `send` was called, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(reason) = &self.failure {
            return Err(MailError::Smtp(reason.clone()));
        }

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());

        Ok(DeliveryReceipt {
            message_id: Some(message.message_id.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MailAddress;

    fn message() -> OutboundMessage {
        OutboundMessage {
            message_id: "<1@example.com>".to_string(),
            from: MailAddress::bare("site@example.com"),
            to: MailAddress::bare("inbox@example.com"),
            reply_to: MailAddress::bare("alice@example.com"),
            subject: "Hi".to_string(),
            text_body: "Hello".to_string(),
            html_body: "<p>Hello</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_sent_messages() {
        let mailer = MemoryMailer::new();
        let handle = mailer.clone();

        let receipt = mailer.send(&message()).await.unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("<1@example.com>"));
        assert_eq!(handle.attempts(), 1);
        assert_eq!(handle.sent().len(), 1);
        assert_eq!(handle.sent()[0].subject, "Hi");
    }

    #[tokio::test]
    async fn test_failing_mailer_counts_attempts() {
        let mailer = MemoryMailer::failing("550 mailbox unavailable");

        let result = mailer.send(&message()).await;

        assert!(matches!(result, Err(MailError::Smtp(_))));
        assert_eq!(mailer.attempts(), 1);
        assert!(mailer.sent().is_empty());
    }
}
