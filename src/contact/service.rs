//! Contact pipeline.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::mail::{DeliveryReceipt, MailError, Mailer, OutboundMessage, TransportConfig};

use super::{
    ChallengeIssuer, ContactError, MessageComposer, Submission, SubmissionValidator,
};

/// Validates, composes and delivers contact submissions.
pub struct ContactService {
    validator: SubmissionValidator,
    composer: MessageComposer,
    transport: Arc<TransportConfig>,
    mailer: Arc<dyn Mailer>,
}

impl ContactService {
    /// Create a service from its parts.
    pub fn new(
        validator: SubmissionValidator,
        composer: MessageComposer,
        transport: Arc<TransportConfig>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            validator,
            composer,
            transport,
            mailer,
        }
    }

    /// Create a service from configuration.
    pub fn from_config(config: &Config, mailer: Arc<dyn Mailer>) -> Self {
        let challenges = Arc::new(ChallengeIssuer::from_config(&config.contact));
        Self::new(
            SubmissionValidator::new(challenges, config.contact.require_signed_challenge),
            MessageComposer::new(config.contact.subject_prefix.clone()),
            Arc::new(config.smtp.clone()),
            mailer,
        )
    }

    /// Issuer for signed challenges.
    pub fn challenges(&self) -> &Arc<ChallengeIssuer> {
        self.validator.challenges()
    }

    /// Transport settings.
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Run one submission through the pipeline.
    ///
    /// Nothing is sent unless every check passes.
    pub async fn submit(&self, submission: &Submission) -> Result<DeliveryReceipt, ContactError> {
        let validated = self.validator.validate(submission)?;

        let settings = self
            .transport
            .resolve()
            .map_err(|e| ContactError::Configuration(e.to_string()))?;

        let message = self.composer.compose(&validated, &settings);

        self.deliver(&message, settings.timeout).await
    }

    /// Hand a message to the mailer. Single attempt, bounded by `timeout`.
    pub async fn deliver(
        &self,
        message: &OutboundMessage,
        timeout: Duration,
    ) -> Result<DeliveryReceipt, ContactError> {
        match tokio::time::timeout(timeout, self.mailer.send(message)).await {
            Ok(Ok(receipt)) => {
                tracing::info!(message_id = %message.message_id, "Contact message delivered");
                Ok(receipt)
            }
            Ok(Err(MailError::MissingConfig(settings))) => {
                Err(ContactError::Configuration(settings))
            }
            Ok(Err(e)) => Err(ContactError::DeliveryFailed(e.to_string())),
            Err(_) => Err(ContactError::DeliveryFailed(
                MailError::Timeout(timeout.as_secs()).to_string(),
            )),
        }
    }
}
