use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::env;
use tracing::warn;

use super::{NotificationSender, SenderError};
use crate::notifications::models::ChannelConfig;

/// A sender for pushing alerts as plain-text mail over SMTP.
///
/// The SMTP relay is fixed deployment configuration, so it is read from the
/// environment once at startup; when `EMAIL_HOST` is unset the sender stays
/// disabled and every send is a silent no-op.
pub struct EmailSender {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: Option<String>,
}

impl EmailSender {
    pub fn from_env() -> Self {
        let Ok(host) = env::var("EMAIL_HOST") else {
            return Self {
                transport: None,
                from_address: None,
            };
        };

        let port: u16 = env::var("EMAIL_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(587);

        // Port 465 is implicit TLS; anything else upgrades via STARTTLS.
        let relay = if port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
        };

        let mut builder = match relay {
            Ok(builder) => builder.port(port),
            Err(e) => {
                warn!(host = %host, error = %e, "Invalid SMTP relay configuration; email alerts disabled.");
                return Self {
                    transport: None,
                    from_address: None,
                };
            }
        };

        if let Ok(username) = env::var("EMAIL_USER") {
            let password = env::var("EMAIL_PASS").unwrap_or_default();
            builder = builder.credentials(Credentials::new(username, password));
        }

        let from_address = env::var("EMAIL_FROM")
            .ok()
            .or_else(|| env::var("EMAIL_USER").ok());

        Self {
            transport: Some(builder.build()),
            from_address,
        }
    }
}

#[async_trait]
impl NotificationSender for EmailSender {
    async fn send(&self, config: &ChannelConfig, message: &str) -> Result<(), SenderError> {
        let (to_address, subject) = match config {
            ChannelConfig::Email {
                to_address,
                subject,
            } => (to_address, subject),
            _ => {
                return Err(SenderError::InvalidConfiguration(
                    "Expected Email config, but found a different type.".to_string(),
                ));
            }
        };

        // No transport means email is not configured for this deployment.
        let Some(transport) = &self.transport else {
            return Ok(());
        };
        let Some(from_address) = &self.from_address else {
            return Err(SenderError::InvalidConfiguration(
                "EMAIL_FROM or EMAIL_USER must be set to send mail.".to_string(),
            ));
        };

        let from: Mailbox = from_address
            .parse()
            .map_err(|e| SenderError::InvalidConfiguration(format!("Invalid from address: {e}")))?;
        let to: Mailbox = to_address
            .parse()
            .map_err(|e| SenderError::InvalidConfiguration(format!("Invalid to address: {e}")))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject.as_str())
            .body(message.to_owned())
            .map_err(|e| SenderError::SendFailed(format!("Failed to build message: {e}")))?;

        transport.send(email).await?;
        Ok(())
    }
}
