//! Mailer trait and SMTP implementation.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::OnceCell;

use super::{DeliveryReceipt, MailError, OutboundMessage, SmtpSettings, TransportConfig};

/// Async email sending trait.
///
/// Implement this trait to plug in another delivery backend.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send a message. Makes a single attempt.
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, MailError>;
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TlsMode {
    /// TLS from the first byte (SMTPS, usually port 465).
    Implicit,
    /// Plain connection upgraded with STARTTLS when the server offers it.
    Opportunistic,
}

impl TlsMode {
    fn for_settings(settings: &SmtpSettings) -> Self {
        if settings.implicit_tls {
            TlsMode::Implicit
        } else {
            TlsMode::Opportunistic
        }
    }
}

/// SMTP mailer backed by lettre.
///
/// The underlying transport is built on first use and then shared by every
/// request.
#[derive(Clone)]
pub struct SmtpMailer {
    config: Arc<TransportConfig>,
    transport: Arc<OnceCell<AsyncSmtpTransport<Tokio1Executor>>>,
}

impl SmtpMailer {
    /// Create a mailer for the given settings.
    pub fn new(config: Arc<TransportConfig>) -> Self {
        Self {
            config,
            transport: Arc::new(OnceCell::new()),
        }
    }

    fn build_transport(
        settings: &SmtpSettings,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let builder = match TlsMode::for_settings(settings) {
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            TlsMode::Opportunistic => {
                let parameters = TlsParameters::new(settings.host.clone())
                    .map_err(|e| MailError::Smtp(format!("TLS configuration failed: {e}")))?;
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
                    .tls(Tls::Opportunistic(parameters))
            }
        };

        let transport = builder
            .port(settings.port)
            .timeout(Some(settings.timeout))
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        tracing::info!(
            host = %settings.host,
            port = settings.port,
            implicit_tls = settings.implicit_tls,
            "SMTP transport initialized"
        );

        Ok(transport)
    }

    /// Build a lettre message from an outbound message.
    fn build_message(message: &OutboundMessage) -> Result<Message, MailError> {
        Message::builder()
            .message_id(Some(message.message_id.clone()))
            .from(message.from.to_mailbox()?)
            .reply_to(message.reply_to.to_mailbox()?)
            .to(message.to.to_mailbox()?)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, MailError> {
        let settings = self.config.resolve()?;
        let email = Self::build_message(message)?;

        let transport = self
            .transport
            .get_or_try_init(|| async { Self::build_transport(&settings) })
            .await?;

        let response = transport
            .send(email)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        tracing::debug!(
            code = %response.code(),
            message_id = %message.message_id,
            "SMTP server accepted message"
        );

        Ok(DeliveryReceipt {
            message_id: Some(message.message_id.clone()),
        })
    }
}
